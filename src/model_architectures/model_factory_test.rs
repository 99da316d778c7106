//! Tests for model factory

use super::config::ArchitectureConfig;
use super::model_factory::*;
use super::traits::{ArchitectureKind, COMMENT_TEXT_INPUT, NUMERIC_INPUT, NUM_LABELS};
use crate::core::{ConfigErrorType, UnifiedError};
use crate::data::dataset::DatasetDescriptor;
use crate::test_fixtures::fixtures::*;
use candle_core::Device;
use rstest::*;
use serial_test::serial;

/// Default configurations of every variant build through the factory
#[rstest]
#[serial]
fn test_model_factory_builds_every_default(small_dataset: DatasetDescriptor) {
    let device = Device::Cpu;
    for kind in ArchitectureKind::ALL {
        let model = ModelFactory::build_default(kind.name(), &small_dataset, &[NUM_LABELS], &device)
            .unwrap_or_else(|e| panic!("{} failed: {}", kind.name(), e));
        assert_eq!(model.kind(), kind);
        assert_eq!(model.inputs().len(), 1);
        assert_eq!(model.inputs()[0].name, COMMENT_TEXT_INPUT);
        assert_eq!(model.output_shape(), [NUM_LABELS]);
        assert!(model.trainable_parameter_count() > 0);
    }
}

/// The optimizer of a built model comes from the variant config
#[rstest]
#[case(r#"{"architecture": "bigru_1", "rnn_size": 4, "lr": 0.01}"#, 0.01)]
#[case(r#"{"architecture": "bigru_cnn_1", "rnn_size": 4, "conv_size": 3}"#, 0.001)]
#[serial]
fn test_model_factory_build_from_json(
    numeric_dataset: DatasetDescriptor,
    #[case] json: &str,
    #[case] lr: f64,
) {
    let config: ArchitectureConfig = serde_json::from_str(json).unwrap();
    let model = ModelFactory::build(&config, &numeric_dataset, &[NUM_LABELS], &Device::Cpu).unwrap();

    assert_eq!(model.kind(), config.kind());
    assert_eq!(model.optimizer().config().lr, lr);
    assert_eq!(model.inputs().len(), 2);
    assert_eq!(model.inputs()[1].name, NUMERIC_INPUT);
    assert_eq!(model.inputs()[1].shape, vec![NUMERIC_COLUMNS.len()]);
}

#[rstest]
fn test_model_factory_unknown_name(small_dataset: DatasetDescriptor) {
    let err = ModelFactory::build_default("lstm_9000", &small_dataset, &[NUM_LABELS], &Device::Cpu)
        .unwrap_err();
    match err {
        UnifiedError::Configuration {
            source: ConfigErrorType::InvalidData(msg),
            ..
        } => assert!(msg.contains("lstm_9000"), "got {}", msg),
        other => panic!("Expected configuration error, got {:?}", other),
    }
}
