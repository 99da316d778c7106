//! # Model Architectures

pub mod compiled;
pub mod config;
pub mod layers;
pub mod model_factory;
pub mod optimizer;
pub mod rnn;
pub mod traits;

pub use compiled::{declare_inputs, CompiledModel};
pub use config::{
    ArchitectureConfig, BiGru1Config, BiGru2Config, BiGruCnn1Config, BiGruRcnn1Config,
    BiGruRcnn2Config, CudnnLstm1Config, TextEmbeddingConfig,
};
pub use layers::pooling::RnnPooling;
pub use model_factory::ModelFactory;
pub use optimizer::{DecayingAdam, OptimizerConfig};
pub use traits::{
    ArchitectureKind, InputSpec, ModelInputs, OutputActivation, TextClassifierNetwork,
    COMMENT_TEXT_INPUT, LABEL_NAMES, NUMERIC_INPUT, NUM_LABELS,
};

#[cfg(test)]
pub mod model_factory_test;
#[cfg(test)]
pub mod optimizer_test;
