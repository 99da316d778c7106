//! Tests for recurrent module

use super::recurrent::*;
use crate::test_fixtures::fixtures::*;
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{VarBuilder, VarMap};
use rstest::*;

/// `[1, 4, 1]` sequence 1, 2, 3, 4
fn ramp(device: &Device) -> Tensor {
    Tensor::new(&[[[1f32], [2.0], [3.0], [4.0]]], device).unwrap()
}

fn flat(x: &Tensor) -> Vec<f32> {
    x.flatten_all().unwrap().to_vec1::<f32>().unwrap()
}

#[rstest]
fn test_recurrent_reverse_time(cpu_device: Device) {
    assert_eq!(
        flat(&reverse_time(&ramp(&cpu_device)).unwrap()),
        vec![4.0, 3.0, 2.0, 1.0]
    );
}

#[rstest]
fn test_recurrent_shift_forward(cpu_device: Device) {
    assert_eq!(
        flat(&shift_forward(&ramp(&cpu_device)).unwrap()),
        vec![0.0, 1.0, 2.0, 3.0]
    );
}

#[rstest]
fn test_recurrent_shift_backward(cpu_device: Device) {
    assert_eq!(
        flat(&shift_backward(&ramp(&cpu_device)).unwrap()),
        vec![2.0, 3.0, 4.0, 0.0]
    );
}

#[rstest]
fn test_recurrent_shift_single_step_is_zero(cpu_device: Device) {
    let x = Tensor::new(&[[[5f32, 6.0]]], &cpu_device).unwrap();
    assert_eq!(flat(&shift_forward(&x).unwrap()), vec![0.0, 0.0]);
    assert_eq!(flat(&shift_backward(&x).unwrap()), vec![0.0, 0.0]);
}

#[rstest]
fn test_recurrent_bigru_shapes(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let rnn = BiGru::new(3, 5, vb).unwrap();
    assert_eq!(rnn.hidden_size(), 5);
    assert_eq!(rnn.output_size(), 10);

    let x = Tensor::randn(0f32, 1.0, (2, 7, 3), &cpu_device).unwrap();
    let out = rnn.forward(&x).unwrap();
    assert_eq!(out.sequence.dims(), &[2, 7, 10]);
    assert_eq!(out.forward_state.dims(), &[2, 5]);
    assert_eq!(out.backward_state.dims(), &[2, 5]);
}

/// The forward state is the last forward output; the backward state is the
/// backward output at position 0
#[rstest]
fn test_recurrent_bigru_states_line_up_with_sequence(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let rnn = BiGru::new(2, 3, vb).unwrap();

    let x = Tensor::randn(0f32, 1.0, (1, 4, 2), &cpu_device).unwrap();
    let out = rnn.forward(&x).unwrap();

    let last_forward = out.sequence.i((.., 3, 0..3)).unwrap();
    let first_backward = out.sequence.i((.., 0, 3..6)).unwrap();
    assert_eq!(flat(&last_forward), flat(&out.forward_state));
    assert_eq!(flat(&first_backward), flat(&out.backward_state));
}

#[rstest]
fn test_recurrent_bilstm_shapes(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let rnn = BiLstm::new(4, 6, vb).unwrap();
    assert_eq!(rnn.output_size(), 12);

    let x = Tensor::randn(0f32, 1.0, (3, 5, 4), &cpu_device).unwrap();
    assert_eq!(rnn.forward(&x).unwrap().dims(), &[3, 5, 12]);
}

/// Each timestep of the forward half depends only on the prefix up to it
#[rstest]
fn test_recurrent_bigru_sequence_is_time_major_per_step(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let rnn = BiGru::new(3, 4, vb).unwrap();

    let x = Tensor::randn(0f32, 1.0, (2, 5, 3), &cpu_device).unwrap();
    let full = rnn.forward(&x).unwrap();
    assert_eq!(full.sequence.dims(), &[2, 5, 8]);

    let prefix = rnn.forward(&x.narrow(1, 0, 2).unwrap()).unwrap();
    for t in 0..2 {
        let a = flat(&full.sequence.i((.., t, 0..4)).unwrap());
        let b = flat(&prefix.sequence.i((.., t, 0..4)).unwrap());
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}

#[rstest]
fn test_recurrent_causal_bigru_shapes(cpu_device: Device) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &cpu_device);
    let rnn = CausalBiGru::new(3, 4, vb).unwrap();

    let x = Tensor::randn(0f32, 1.0, (2, 6, 3), &cpu_device).unwrap();
    let (left, right) = rnn.forward(&x).unwrap();
    assert_eq!(left.dims(), &[2, 6, 4]);
    assert_eq!(right.dims(), &[2, 6, 4]);
}
