//! # Core Layer
//!
//! Error type, experiment configuration loading and logging setup.

// Core modules
pub mod config_loader;
pub mod logging;
pub mod unified_error;

// Re-export unified configuration loader
pub use config_loader::{ExperimentConfig, UnifiedConfigLoader};

pub use logging::init_logging;

pub use unified_error::{
    concurrency_error, config_errors, from_candle_error, model_errors, processing_errors,
    ConfigErrorType, ErrorUnification, ModelErrorType, UnifiedError, UnifiedResult,
};

#[cfg(test)]
pub mod unified_error_test;
