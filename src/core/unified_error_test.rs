//! Tests for unified_error module

use super::unified_error::*;
use crate::{config_error, validation_error};
use rstest::*;

/// Test UnifiedError creation and formatting
#[rstest]
#[case("config_load", "Invalid JSON format", Some("file: experiment.json".to_string()), "Configuration")]
#[case("model_build", "GRU weights missing", None, "Model")]
#[case("tensor_op", "Shape mismatch", Some("input shape: [4, 50]".to_string()), "Processing")]
fn test_unified_error_unified_error_creation_and_formatting(
    #[case] operation: &str,
    #[case] message: &str,
    #[case] context: Option<String>,
    #[case] error_type: &str,
) {
    let error = match error_type {
        "Configuration" => UnifiedError::Configuration {
            operation: operation.to_string(),
            source: ConfigErrorType::InvalidData(message.to_string()),
            context: context.clone(),
        },
        "Model" => UnifiedError::Model {
            model_type: ModelErrorType::Architecture,
            operation: operation.to_string(),
            source: message.to_string(),
            context: context.clone(),
        },
        "Processing" => UnifiedError::Processing {
            operation: operation.to_string(),
            source: message.to_string(),
            input_context: context.clone(),
        },
        _ => panic!("Unknown error type: {}", error_type),
    };

    let error_string = format!("{}", error);
    assert!(
        error_string.contains(operation),
        "Error should contain operation name"
    );
    assert!(
        error_string.contains(message),
        "Error should contain error message"
    );
    if let Some(ref ctx) = context {
        assert!(
            error_string.contains(ctx),
            "Error should contain context if provided"
        );
    }
}

/// Test error conversion from standard library and candle errors
#[rstest]
fn test_unified_error_error_conversions() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let unified_error: UnifiedError = io_error.into();
    match unified_error {
        UnifiedError::IO {
            operation, source, ..
        } => {
            assert_eq!(operation, "I/O operation");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        _ => panic!("Expected IO error variant"),
    }

    let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
    let unified_error: UnifiedError = json_error.into();
    match unified_error {
        UnifiedError::Configuration {
            operation,
            source: ConfigErrorType::ParseError(_),
            ..
        } => assert_eq!(operation, "JSON parsing"),
        _ => panic!("Expected Configuration ParseError variant"),
    }

    let candle_error = candle_core::Error::Msg("shape mismatch".to_string());
    let unified_error: UnifiedError = candle_error.into();
    match unified_error {
        UnifiedError::External { library, error, .. } => {
            assert_eq!(library, "candle");
            assert!(error.contains("shape mismatch"));
        }
        _ => panic!("Expected External error variant"),
    }

    let back: candle_core::Error = config_errors::unknown_pooling("x").into();
    assert!(back.to_string().contains("Unknown pooling"));
}

/// Unknown pooling names are quoted in the message
#[rstest]
#[case("bogus")]
#[case("GMP")]
#[case("")]
fn test_unified_error_unknown_pooling_names_value(#[case] value: &str) {
    let error = config_errors::unknown_pooling(value);
    let message = error.to_string();
    assert!(message.contains("Unknown pooling"), "got: {}", message);
    assert!(message.contains(&format!("\"{}\"", value)), "got: {}", message);
    assert!(matches!(
        error,
        UnifiedError::Configuration {
            source: ConfigErrorType::InvalidData(_),
            ..
        }
    ));
}

/// Test error helper functions
#[rstest]
fn test_unified_error_error_helper_functions() {
    match config_errors::file_not_found("experiment.json") {
        UnifiedError::Configuration {
            source: ConfigErrorType::FileNotFound(path),
            ..
        } => assert_eq!(path, "experiment.json"),
        _ => panic!("Expected FileNotFound error"),
    }

    match config_errors::missing_field("model.architecture", "experiment.json") {
        UnifiedError::Configuration {
            source: ConfigErrorType::MissingField(field),
            context,
            ..
        } => {
            assert_eq!(field, "model.architecture");
            assert!(context.is_some());
        }
        _ => panic!("Expected MissingField error"),
    }

    match model_errors::malformed_embedding_file("glove.txt", 7, "expected 4 values, found 3") {
        UnifiedError::Model {
            model_type: ModelErrorType::Embedding,
            context: Some(ctx),
            ..
        } => assert!(ctx.contains("line: 7")),
        _ => panic!("Expected Embedding model error"),
    }

    match model_errors::not_built("predict") {
        UnifiedError::Model {
            model_type: ModelErrorType::Architecture,
            operation,
            ..
        } => assert_eq!(operation, "predict"),
        _ => panic!("Expected Architecture model error"),
    }

    match processing_errors::batch_processing(32, "out of memory") {
        UnifiedError::Processing { input_context, .. } => {
            assert_eq!(input_context.as_deref(), Some("batch_size: 32"))
        }
        _ => panic!("Expected Processing error"),
    }

    match concurrency_error("variable registration", "poisoned lock") {
        UnifiedError::Concurrency { reason, .. } => assert_eq!(reason, "poisoned lock"),
        _ => panic!("Expected Concurrency error"),
    }
}

/// Test the error macros
#[rstest]
fn test_unified_error_macros() {
    let err = config_error!("rnn pooling selection", "bad value", "bigru_1");
    assert!(err.to_string().contains("bad value"));

    let err = validation_error!("max_text_len", ">= 2", 1);
    match err {
        UnifiedError::Validation {
            field,
            expected,
            actual,
            context,
        } => {
            assert_eq!(field, "max_text_len");
            assert_eq!(expected, ">= 2");
            assert_eq!(actual, "1");
            assert!(context.is_none());
        }
        _ => panic!("Expected Validation error"),
    }
}

/// ErrorUnification attaches the requested context
#[rstest]
fn test_unified_error_error_unification_trait() {
    let result: Result<(), String> = Err("boom".to_string());
    let err = result
        .with_model_context(ModelErrorType::Optimizer, "optimizer step", Some("iteration 3"))
        .unwrap_err();
    assert!(matches!(
        err,
        UnifiedError::Model {
            model_type: ModelErrorType::Optimizer,
            ..
        }
    ));

    let result: Result<(), String> = Err("bad shape".to_string());
    let err = result
        .with_processing_context("binary cross-entropy", None)
        .unwrap_err();
    assert!(err.to_string().contains("bad shape"));
}
