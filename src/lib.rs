//! # candle-toxic-rnn
//!
//! Recurrent text classifiers for six-label comment tagging, built on the
//! candle tensor runtime.
//!
//! - `core`: error type, experiment config loading, logging setup
//! - `data`: dataset descriptor, word-index tokenizer, embedding loader
//! - `model_architectures`: layers, the six architecture builders, the
//!   compiled model and the factory
//! - `training`: transform chains, batch sequences, `RnnClassifier` and
//!   `AugmentedModel`
//!
//! ```no_run
//! use candle_core::Device;
//! use candle_toxic_rnn::data::DatasetDescriptor;
//! use candle_toxic_rnn::model_architectures::{rnn::bigru_1, BiGru1Config};
//!
//! # fn main() -> candle_toxic_rnn::core::UnifiedResult<()> {
//! let data = DatasetDescriptor::fit(&["some text", "more text"], Vec::new(), 50, 1000);
//! let model = bigru_1(&data, &[6], &BiGru1Config::default(), &Device::Cpu)?;
//! assert_eq!(model.output_shape(), [6]);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod model_architectures;
pub mod training;

pub mod test_fixtures;

pub use crate::core::{UnifiedError, UnifiedResult};
pub use crate::data::DatasetDescriptor;
pub use crate::model_architectures::{ArchitectureConfig, CompiledModel, ModelFactory};
pub use crate::training::{AugmentedModel, RnnClassifier, TrainableModel, TrainingConfig};
