//! Tests for dense module

use super::dense::*;
use crate::model_architectures::traits::NUM_LABELS;
use crate::test_fixtures::fixtures::*;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use rstest::*;

#[rstest]
#[case(DenseActivation::Identity, vec![-1.0, 0.0, 2.0])]
#[case(DenseActivation::Relu, vec![0.0, 0.0, 2.0])]
fn test_dense_activation_apply(
    cpu_device: Device,
    #[case] activation: DenseActivation,
    #[case] expected: Vec<f32>,
) {
    let x = Tensor::new(&[-1f32, 0.0, 2.0], &cpu_device).unwrap();
    assert_eq!(activation.apply(&x).unwrap().to_vec1::<f32>().unwrap(), expected);
}

#[rstest]
fn test_dense_activation_serde_names() {
    assert_eq!(
        serde_json::from_str::<DenseActivation>("\"linear\"").unwrap(),
        DenseActivation::Identity
    );
    assert_eq!(
        serde_json::from_str::<DenseActivation>("\"tanh\"").unwrap(),
        DenseActivation::Tanh
    );
    assert_eq!(serde_json::to_string(&DenseActivation::Relu).unwrap(), "\"relu\"");
}

/// Dense layers apply to the last dimension, so they work per timestep
#[rstest]
fn test_dense_layer_per_timestep(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let layer = DenseLayer::new(6, 4, DenseActivation::Tanh, vb).unwrap();
    assert_eq!(layer.in_features(), 6);
    assert_eq!(layer.out_features(), 4);

    let x = Tensor::randn(0f32, 1.0, (2, 9, 6), &cpu_device).unwrap();
    let y = layer.forward(&x).unwrap();
    assert_eq!(y.dims(), &[2, 9, 4]);
    let max = y.abs().unwrap().max_all().unwrap().to_scalar::<f32>().unwrap();
    assert!(max <= 1.0);
}

#[rstest]
fn test_dense_spatial_dropout_inference_is_identity(cpu_device: Device) {
    let x = Tensor::randn(0f32, 1.0, (2, 5, 3), &cpu_device).unwrap();
    let y = spatial_dropout_1d(&x, 0.5, false).unwrap();
    assert_eq!(
        y.flatten_all().unwrap().to_vec1::<f32>().unwrap(),
        x.flatten_all().unwrap().to_vec1::<f32>().unwrap()
    );
}

/// Each channel is either dropped at every timestep or kept and rescaled
#[rstest]
fn test_dense_spatial_dropout_drops_whole_channels(cpu_device: Device) {
    let x = Tensor::ones((4, 6, 16), DType::F32, &cpu_device).unwrap();
    let y = spatial_dropout_1d(&x, 0.5, true)
        .unwrap()
        .to_vec3::<f32>()
        .unwrap();
    for example in &y {
        for channel in 0..16 {
            let first = example[0][channel];
            assert!(first == 0.0 || (first - 2.0).abs() < 1e-6);
            assert!(example.iter().all(|step| step[channel] == first));
        }
    }
}

#[rstest]
fn test_dense_spatial_dropout_full_rate_zeroes(cpu_device: Device) {
    let x = Tensor::ones((1, 2, 3), DType::F32, &cpu_device).unwrap();
    let y = spatial_dropout_1d(&x, 1.0, true).unwrap();
    assert_eq!(y.sum_all().unwrap().to_scalar::<f32>().unwrap(), 0.0);
}

#[rstest]
#[case(vec![], 10)]
#[case(vec![8], 8)]
#[case(vec![8, 3], 3)]
fn test_dense_mlp_stack_widths(
    cpu_device: Device,
    #[case] sizes: Vec<usize>,
    #[case] expected: usize,
) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let mlp = MlpStack::new(
        10,
        &sizes,
        DenseActivation::Relu,
        Some(0.3),
        DropoutPlacement::After,
        vb,
    )
    .unwrap();
    assert_eq!(mlp.out_features(), expected);

    let x = Tensor::randn(0f32, 1.0, (5, 10), &cpu_device).unwrap();
    assert_eq!(mlp.forward(&x, true).unwrap().dims(), &[5, expected]);
    assert_eq!(mlp.forward(&x, false).unwrap().dims(), &[5, expected]);
}

#[rstest]
fn test_dense_numeric_branches(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let pooled = Tensor::zeros((2, 4), DType::F32, &cpu_device).unwrap();
    let numeric = Tensor::ones((2, 3), DType::F32, &cpu_device).unwrap();

    let passthrough = NumericBranch::passthrough(3);
    assert_eq!(passthrough.out_features(), 3);
    let joined = passthrough.concat(&pooled, &numeric).unwrap();
    assert_eq!(joined.dims(), &[2, 7]);
    assert_eq!(joined.to_vec2::<f32>().unwrap()[0], vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

    let projected = NumericBranch::projected(3, 16, vb).unwrap();
    assert_eq!(projected.out_features(), 16);
    let joined = projected.concat(&pooled, &numeric).unwrap();
    assert_eq!(joined.dims(), &[2, 20]);
    let min = joined.min_all().unwrap().to_scalar::<f32>().unwrap();
    assert!(min >= 0.0, "relu projection and zero pooled part are non-negative");
}

#[rstest]
fn test_dense_classification_head_width(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let head = ClassificationHead::new(12, Some(0.1), vb).unwrap();
    let x = Tensor::randn(0f32, 1.0, (3, 12), &cpu_device).unwrap();
    assert_eq!(head.forward(&x, true).unwrap().dims(), &[3, NUM_LABELS]);
    assert_eq!(varmap.all_vars().len(), 2);
}
