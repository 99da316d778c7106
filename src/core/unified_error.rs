//! Unified Error Handling
//!
//! One structured error type for every fallible operation in the crate:
//! configuration parsing, embedding loading, model construction, batch
//! processing and training. Builders return `UnifiedResult<T>`; candle
//! errors raised inside the tensor runtime are wrapped as `External`.

use std::fmt;

/// Unified error type for all classifier operations
#[derive(Debug)]
pub enum UnifiedError {
    /// Configuration-related errors (file loading, parsing, unknown options)
    Configuration {
        operation: String,
        source: ConfigErrorType,
        context: Option<String>,
    },

    /// Model-related errors (construction, checkpoints, optimizer setup)
    Model {
        model_type: ModelErrorType,
        operation: String,
        source: String,
        context: Option<String>,
    },

    /// Processing errors (batch assembly, transforms, training steps)
    Processing {
        operation: String,
        source: String,
        input_context: Option<String>,
    },

    /// I/O errors (embedding files, checkpoints)
    IO {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },

    /// Validation errors (input validation, parameter checks)
    Validation {
        field: String,
        expected: String,
        actual: String,
        context: Option<String>,
    },

    /// Poisoned locks around shared variable stores
    Concurrency { operation: String, reason: String },

    /// External library errors (candle)
    External {
        library: String,
        operation: String,
        error: String,
    },
}

/// Configuration error subtypes
#[derive(Debug)]
pub enum ConfigErrorType {
    FileNotFound(String),
    ParseError(String),
    MissingField(String),
    InvalidData(String),
}

/// Model error subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorType {
    Architecture,
    Embedding,
    Optimizer,
    Checkpoint,
}

impl fmt::Display for UnifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifiedError::Configuration {
                operation,
                source,
                context,
            } => {
                write!(f, "Configuration error in '{}': {}", operation, source)?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            UnifiedError::Model {
                model_type,
                operation,
                source,
                context,
            } => {
                write!(
                    f,
                    "Model error ({:?}) in '{}': {}",
                    model_type, operation, source
                )?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            UnifiedError::Processing {
                operation,
                source,
                input_context,
            } => {
                write!(f, "Processing error in '{}': {}", operation, source)?;
                if let Some(ctx) = input_context {
                    write!(f, " (input: {})", ctx)?;
                }
                Ok(())
            }
            UnifiedError::IO {
                operation,
                path,
                source,
            } => {
                write!(f, "I/O error in '{}': {}", operation, source)?;
                if let Some(p) = path {
                    write!(f, " (path: {})", p)?;
                }
                Ok(())
            }
            UnifiedError::Validation {
                field,
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Validation error for '{}': expected '{}', got '{}'",
                    field, expected, actual
                )?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            UnifiedError::Concurrency { operation, reason } => {
                write!(f, "Concurrency error in '{}': {}", operation, reason)
            }
            UnifiedError::External {
                library,
                operation,
                error,
            } => {
                write!(
                    f,
                    "External error in {} during '{}': {}",
                    library, operation, error
                )
            }
        }
    }
}

impl fmt::Display for ConfigErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErrorType::FileNotFound(path) => write!(f, "file not found: {}", path),
            ConfigErrorType::ParseError(msg) => write!(f, "parse error: {}", msg),
            ConfigErrorType::MissingField(field) => write!(f, "missing required field: {}", field),
            ConfigErrorType::InvalidData(msg) => write!(f, "invalid data: {}", msg),
        }
    }
}

impl std::error::Error for UnifiedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UnifiedError::IO { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for unified error handling
pub type UnifiedResult<T> = Result<T, UnifiedError>;

/// Attach operation context while converting foreign errors
pub trait ErrorUnification<T> {
    fn with_model_context(
        self,
        model_type: ModelErrorType,
        operation: &str,
        context: Option<&str>,
    ) -> UnifiedResult<T>;
    fn with_processing_context(
        self,
        operation: &str,
        input_context: Option<&str>,
    ) -> UnifiedResult<T>;
}

impl<T, E> ErrorUnification<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn with_model_context(
        self,
        model_type: ModelErrorType,
        operation: &str,
        context: Option<&str>,
    ) -> UnifiedResult<T> {
        self.map_err(|e| UnifiedError::Model {
            model_type,
            operation: operation.to_string(),
            source: e.to_string(),
            context: context.map(|s| s.to_string()),
        })
    }

    fn with_processing_context(
        self,
        operation: &str,
        input_context: Option<&str>,
    ) -> UnifiedResult<T> {
        self.map_err(|e| UnifiedError::Processing {
            operation: operation.to_string(),
            source: e.to_string(),
            input_context: input_context.map(|s| s.to_string()),
        })
    }
}

/// Errors raised inside network code surface as candle errors
impl From<UnifiedError> for candle_core::Error {
    fn from(err: UnifiedError) -> Self {
        candle_core::Error::Msg(err.to_string())
    }
}

impl From<candle_core::Error> for UnifiedError {
    fn from(err: candle_core::Error) -> Self {
        from_candle_error(err, "tensor operation", None)
    }
}

impl From<std::io::Error> for UnifiedError {
    fn from(err: std::io::Error) -> Self {
        UnifiedError::IO {
            operation: "I/O operation".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<serde_json::Error> for UnifiedError {
    fn from(err: serde_json::Error) -> Self {
        UnifiedError::Configuration {
            operation: "JSON parsing".to_string(),
            source: ConfigErrorType::ParseError(err.to_string()),
            context: None,
        }
    }
}

/// Create a configuration error
#[macro_export]
macro_rules! config_error {
    ($operation:expr, $msg:expr) => {
        $crate::core::UnifiedError::Configuration {
            operation: $operation.to_string(),
            source: $crate::core::ConfigErrorType::InvalidData($msg.to_string()),
            context: None,
        }
    };
    ($operation:expr, $msg:expr, $context:expr) => {
        $crate::core::UnifiedError::Configuration {
            operation: $operation.to_string(),
            source: $crate::core::ConfigErrorType::InvalidData($msg.to_string()),
            context: Some($context.to_string()),
        }
    };
}

/// Create a validation error
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $expected:expr, $actual:expr) => {
        $crate::core::UnifiedError::Validation {
            field: $field.to_string(),
            expected: $expected.to_string(),
            actual: $actual.to_string(),
            context: None,
        }
    };
    ($field:expr, $expected:expr, $actual:expr, $context:expr) => {
        $crate::core::UnifiedError::Validation {
            field: $field.to_string(),
            expected: $expected.to_string(),
            actual: $actual.to_string(),
            context: Some($context.to_string()),
        }
    };
}

/// Convert candle_core::Error to UnifiedError with context
pub fn from_candle_error(
    err: candle_core::Error,
    operation: &str,
    _context: Option<&str>,
) -> UnifiedError {
    UnifiedError::External {
        library: "candle".to_string(),
        operation: operation.to_string(),
        error: err.to_string(),
    }
}

/// Create a concurrency error
pub fn concurrency_error(operation: &str, reason: &str) -> UnifiedError {
    UnifiedError::Concurrency {
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
}

/// Configuration errors
pub mod config_errors {
    use super::*;

    pub fn file_not_found(path: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "config file loading".to_string(),
            source: ConfigErrorType::FileNotFound(path.to_string()),
            context: None,
        }
    }

    pub fn invalid_json(file: &str, error: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "JSON parsing".to_string(),
            source: ConfigErrorType::ParseError(error.to_string()),
            context: Some(format!("file: {}", file)),
        }
    }

    pub fn missing_field(field: &str, file: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "config field extraction".to_string(),
            source: ConfigErrorType::MissingField(field.to_string()),
            context: Some(format!("file: {}", file)),
        }
    }

    pub fn unknown_pooling(value: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "rnn pooling selection".to_string(),
            source: ConfigErrorType::InvalidData(format!("Unknown pooling: {:?}", value)),
            context: Some("expected one of: none, gmp, sterby".to_string()),
        }
    }

    pub fn unknown_architecture(name: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "architecture selection".to_string(),
            source: ConfigErrorType::InvalidData(format!("Unknown architecture: {:?}", name)),
            context: None,
        }
    }
}

/// Model operation errors
pub mod model_errors {
    use super::*;

    pub fn malformed_embedding_file(path: &str, line: usize, error: &str) -> UnifiedError {
        UnifiedError::Model {
            model_type: ModelErrorType::Embedding,
            operation: "embedding file parsing".to_string(),
            source: error.to_string(),
            context: Some(format!("path: {}, line: {}", path, line)),
        }
    }

    pub fn checkpoint_failure(path: &str, error: &str) -> UnifiedError {
        UnifiedError::Model {
            model_type: ModelErrorType::Checkpoint,
            operation: "checkpoint I/O".to_string(),
            source: error.to_string(),
            context: Some(format!("path: {}", path)),
        }
    }

    pub fn not_built(operation: &str) -> UnifiedError {
        UnifiedError::Model {
            model_type: ModelErrorType::Architecture,
            operation: operation.to_string(),
            source: "model has not been built; call fit first".to_string(),
            context: None,
        }
    }
}

/// Processing operation errors
pub mod processing_errors {
    use super::*;

    pub fn batch_processing(batch_size: usize, error: &str) -> UnifiedError {
        UnifiedError::Processing {
            operation: "batch processing".to_string(),
            source: error.to_string(),
            input_context: Some(format!("batch_size: {}", batch_size)),
        }
    }

    pub fn empty_input(operation: &str) -> UnifiedError {
        UnifiedError::Processing {
            operation: operation.to_string(),
            source: "empty input provided".to_string(),
            input_context: None,
        }
    }
}
