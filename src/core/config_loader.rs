//! Unified Configuration Loader

use crate::core::unified_error::{config_errors, UnifiedError};
use crate::model_architectures::config::ArchitectureConfig;
use crate::training::config::TrainingConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// One experiment: the architecture to build and how to train it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub model: ArchitectureConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

/// Unified configuration loader for experiment files
pub struct UnifiedConfigLoader;

impl UnifiedConfigLoader {
    /// Load and parse a JSON file from a specific path
    pub fn load_json_config_from_path<P: AsRef<Path>>(
        config_path: P,
    ) -> Result<Value, UnifiedError> {
        let path = config_path.as_ref().to_string_lossy().to_string();
        let config_content = std::fs::read_to_string(config_path.as_ref())
            .map_err(|_e| config_errors::file_not_found(&path))?;

        serde_json::from_str(&config_content)
            .map_err(|e| config_errors::invalid_json(&path, &e.to_string()))
    }

    /// Load an `ExperimentConfig` from a JSON file
    ///
    /// Missing fields take their defaults; an unknown architecture tag or
    /// pooling name is reported as a parse error naming the value.
    pub fn load_experiment_config<P: AsRef<Path>>(
        config_path: P,
    ) -> Result<ExperimentConfig, UnifiedError> {
        let path = config_path.as_ref().to_string_lossy().to_string();
        let config_content = std::fs::read_to_string(config_path.as_ref())
            .map_err(|_e| config_errors::file_not_found(&path))?;

        let config: ExperimentConfig = serde_json::from_str(&config_content)
            .map_err(|e| config_errors::invalid_json(&path, &e.to_string()))?;
        config.training.validate()?;
        debug!(
            path = %path,
            architecture = config.model.kind().name(),
            epochs = config.training.epochs,
            batch_size = config.training.batch_size,
            "loaded experiment config"
        );
        Ok(config)
    }

    /// Parse an `ExperimentConfig` from a JSON string
    pub fn parse_experiment_config(content: &str) -> Result<ExperimentConfig, UnifiedError> {
        let config: ExperimentConfig = serde_json::from_str(content)?;
        config.training.validate()?;
        Ok(config)
    }

    /// Write `config` as pretty JSON
    pub fn save_experiment_config<P: AsRef<Path>>(
        config: &ExperimentConfig,
        config_path: P,
    ) -> Result<(), UnifiedError> {
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(config_path.as_ref(), content).map_err(|e| UnifiedError::IO {
            operation: "write experiment config".to_string(),
            path: Some(config_path.as_ref().to_string_lossy().to_string()),
            source: e,
        })
    }

    /// Read the architecture tag without deserializing the whole file
    pub fn extract_architecture_name(config_json: &Value) -> Result<String, UnifiedError> {
        config_json
            .get("model")
            .and_then(|m| m.get("architecture"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| config_errors::missing_field("model.architecture", "experiment config"))
    }
}
