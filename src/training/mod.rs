//! # Training Layer
//!
//! Sequential batch generation and the epoch loop. Everything here runs
//! on the calling thread; parallelism stays inside candle.

pub mod augmented;
pub mod config;
pub mod features;
pub mod rnn_classifier;
pub mod sequence;
pub mod transform;

pub use augmented::{Augmentation, AugmentedModel};
pub use config::TrainingConfig;
pub use features::{Comment, CommentFeatureTransformer, LabelRow, LabelTransformer};
pub use rnn_classifier::{
    RnnClassifier, SequenceBuilder, TestSequence, TrainSequence, TrainableModel, TrainingHistory,
};
pub use sequence::{DefaultTestSequence, DefaultTrainSequence};
pub use transform::{FnTransform, MultiStep, Transform};

// Test modules
#[cfg(test)]
pub mod augmented_test;
