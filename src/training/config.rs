//! Training Loop Configuration

use crate::config_error;
use crate::core::UnifiedResult;
use candle_core::Device;
use serde::{Deserialize, Serialize};

/// How `RnnClassifier::fit` iterates over the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Examples per optimizer step (default 128)
    pub batch_size: usize,
    /// Passes over the training data (default 1)
    pub epochs: usize,
    /// Reshuffle example order between epochs (default true)
    pub shuffle: bool,
    /// Seed for the shuffling RNG (default 42)
    pub seed: u64,
    /// Run on the CPU even when an accelerator is available (default true)
    pub use_cpu: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: 128,
            epochs: 1,
            shuffle: true,
            seed: 42,
            use_cpu: true,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> UnifiedResult<()> {
        if self.batch_size == 0 {
            return Err(config_error!("training config", "batch_size must be > 0"));
        }
        if self.epochs == 0 {
            return Err(config_error!("training config", "epochs must be > 0"));
        }
        Ok(())
    }

    /// Device selected by `use_cpu` and the enabled accelerator features
    pub fn device(&self) -> Device {
        if self.use_cpu {
            return Device::Cpu;
        }
        #[cfg(feature = "cuda")]
        if let Ok(device) = Device::new_cuda(0) {
            return device;
        }
        #[cfg(feature = "metal")]
        if let Ok(device) = Device::new_metal(0) {
            return device;
        }
        Device::Cpu
    }
}
