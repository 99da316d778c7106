//! # Data Layer
//!
//! Dataset descriptor, Keras-style tokenizer and pretrained embedding loading.

pub mod dataset;
pub mod embedding_loader;

pub use dataset::{pad_sequence, pad_sequences, DatasetDescriptor, TextTokenizer};
pub use embedding_loader::{load_emb_matrix, EmbeddingLoadOptions, EmbeddingMatrix};

// Test modules
#[cfg(test)]
pub mod dataset_test;
