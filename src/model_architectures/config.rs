//! Architecture Configuration
//!
//! One serde struct per variant; every field has a default so an experiment
//! file only lists what it overrides. `ArchitectureConfig` selects a variant
//! by its `"architecture"` tag.

use crate::core::{config_errors, UnifiedResult};
use crate::model_architectures::layers::dense::DenseActivation;
use crate::model_architectures::layers::pooling::RnnPooling;
use crate::model_architectures::optimizer::OptimizerConfig;
use crate::model_architectures::traits::ArchitectureKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Learning-rate decay of the LSTM and plain BiGRU variants
pub const SLOW_DECAY: f64 = 0.000015;

/// Token embedding settings shared by most variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEmbeddingConfig {
    /// Spatial dropout rate on the embedded sequence (default 0.2)
    pub text_emb_dropout: f32,
    /// Embedding width (default 32)
    pub text_emb_size: usize,
    /// Pretrained vectors file (default none: random trainable embedding)
    pub text_emb_file: Option<PathBuf>,
    /// Keep training pretrained vectors (default false)
    pub text_emb_trainable: bool,
    /// Std of random rows for tokens missing from the file (default none: zeros)
    pub text_emb_rand_std: Option<f32>,
}

impl Default for TextEmbeddingConfig {
    fn default() -> Self {
        Self {
            text_emb_dropout: 0.2,
            text_emb_size: 32,
            text_emb_file: None,
            text_emb_trainable: false,
            text_emb_rand_std: None,
        }
    }
}

impl TextEmbeddingConfig {
    /// Random embeddings always train; pretrained ones only when asked to
    pub fn trainable(&self) -> bool {
        self.text_emb_file.is_none() || self.text_emb_trainable
    }
}

/// `cudnn_lstm_1`: stacked bidirectional LSTMs, global max pooling, relu MLP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CudnnLstm1Config {
    /// Learning rate (default 3e-4)
    pub lr: f64,
    /// Learning-rate decay (default 1.5e-5)
    pub decay: f64,
    /// Spatial dropout after each LSTM layer (default none)
    pub rnn_dropout: Option<f32>,
    /// Units per direction of each stacked LSTM (default [50])
    pub rnn_layers: Vec<usize>,
    /// Relu dense layers after pooling (default [70])
    pub mlp_layers: Vec<usize>,
    /// Dropout after each MLP layer (default 0.3)
    pub mlp_dropout: f32,
    /// Plain dropout on the embedded sequence (default 0.2)
    pub text_emb_dropout: f32,
    /// Embedding width (default 32)
    pub text_emb_size: usize,
    /// Pretrained vectors file, installed frozen (default none)
    pub text_emb_file: Option<PathBuf>,
}

impl Default for CudnnLstm1Config {
    fn default() -> Self {
        Self {
            lr: 0.0003,
            decay: SLOW_DECAY,
            rnn_dropout: None,
            rnn_layers: vec![50],
            mlp_layers: vec![70],
            mlp_dropout: 0.3,
            text_emb_dropout: 0.2,
            text_emb_size: 32,
            text_emb_file: None,
        }
    }
}

/// `bigru_1`: one bidirectional GRU with a configurable readout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiGru1Config {
    /// Learning rate (default 3e-4)
    pub lr: f64,
    /// Learning-rate decay (default 1.5e-5)
    pub decay: f64,
    /// GRU units per direction (default 64)
    pub rnn_size: usize,
    /// Readout (default final states)
    pub rnn_pooling: RnnPooling,
    /// Dropout before the output layer (default 0.1)
    pub out_dropout: f32,
    #[serde(flatten)]
    pub embedding: TextEmbeddingConfig,
}

impl Default for BiGru1Config {
    fn default() -> Self {
        Self {
            lr: 0.0003,
            decay: SLOW_DECAY,
            rnn_size: 64,
            rnn_pooling: RnnPooling::FinalStates,
            out_dropout: 0.1,
            embedding: TextEmbeddingConfig::default(),
        }
    }
}

/// `bigru_2`: fixed pretrained embedding joined with a free trainable one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiGru2Config {
    /// Learning rate (default 3e-4)
    pub lr: f64,
    /// Learning-rate decay (default 1.5e-5)
    pub decay: f64,
    /// GRU units per direction (default 64)
    pub rnn_size: usize,
    /// Readout (default final states)
    pub rnn_pooling: RnnPooling,
    /// Dropout before the output layer (default 0.1)
    pub out_dropout: f32,
    /// Width of the relu projection of the numeric input (default 16)
    pub num_layer_size: usize,
    /// Spatial dropout on the joined embedding (default 0.2)
    pub text_emb_dropout: f32,
    /// Width of the fixed embedding (default 32)
    pub text_emb_fix_size: usize,
    /// Pretrained vectors for the fixed embedding (default none)
    pub text_emb_fix_file: Option<PathBuf>,
    /// Width of the free embedding, 0 disables it (default 8)
    pub text_emb_free_size: usize,
}

impl Default for BiGru2Config {
    fn default() -> Self {
        Self {
            lr: 0.0003,
            decay: SLOW_DECAY,
            rnn_size: 64,
            rnn_pooling: RnnPooling::FinalStates,
            out_dropout: 0.1,
            num_layer_size: 16,
            text_emb_dropout: 0.2,
            text_emb_fix_size: 32,
            text_emb_fix_file: None,
            text_emb_free_size: 8,
        }
    }
}

/// `bigru_cnn_1`: BiGRU sequence into a width-2 convolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiGruCnn1Config {
    /// Learning rate (default 1e-3)
    pub lr: f64,
    /// Learning-rate decay (default 0)
    pub decay: f64,
    /// GRU units per direction (default 128)
    pub rnn_size: usize,
    /// Spatial dropout on the GRU sequence (default none)
    pub rnn_dropout: Option<f32>,
    /// Convolution filters (default 64)
    pub conv_size: usize,
    /// Dropout before the output layer (default none)
    pub out_dropout: Option<f32>,
    #[serde(flatten)]
    pub embedding: TextEmbeddingConfig,
}

impl Default for BiGruCnn1Config {
    fn default() -> Self {
        Self {
            lr: 1e-3,
            decay: 0.0,
            rnn_size: 128,
            rnn_dropout: None,
            conv_size: 64,
            out_dropout: None,
            embedding: TextEmbeddingConfig::default(),
        }
    }
}

/// `bigru_rcnn_1`: BiGRU sequence joined with the embeddings, per-step projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiGruRcnn1Config {
    /// Learning rate (default 1e-3)
    pub lr: f64,
    /// Learning-rate decay (default 0)
    pub decay: f64,
    /// GRU units per direction (default 128)
    pub rnn_size: usize,
    /// Spatial dropout on the GRU sequence (default none)
    pub rnn_dropout: Option<f32>,
    /// Width of the per-timestep projection (default 64)
    pub rnn_dense_size: usize,
    /// Activation of the per-timestep projection (default identity)
    pub rnn_dense_activation: DenseActivation,
    /// Linear dense layers after pooling (default [])
    pub mlp_layers: Vec<usize>,
    /// Dropout before each MLP layer (default 0.2)
    pub mlp_dropout: Option<f32>,
    /// Dropout before the output layer (default none)
    pub out_dropout: Option<f32>,
    #[serde(flatten)]
    pub embedding: TextEmbeddingConfig,
}

impl Default for BiGruRcnn1Config {
    fn default() -> Self {
        Self {
            lr: 1e-3,
            decay: 0.0,
            rnn_size: 128,
            rnn_dropout: None,
            rnn_dense_size: 64,
            rnn_dense_activation: DenseActivation::Identity,
            mlp_layers: Vec::new(),
            mlp_dropout: Some(0.2),
            out_dropout: None,
            embedding: TextEmbeddingConfig::default(),
        }
    }
}

/// `bigru_rcnn_2`: causal left/right GRU contexts around each embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiGruRcnn2Config {
    /// Learning rate (default 1e-3)
    pub lr: f64,
    /// Learning-rate decay (default 0)
    pub decay: f64,
    /// Units of each context GRU (default 128)
    pub rnn_size: usize,
    /// Spatial dropout on each context sequence (default none)
    pub rnn_dropout: Option<f32>,
    /// Width of the tanh per-timestep projection (default 64)
    pub rnn_dense_size: usize,
    /// Linear dense layers after pooling (default [])
    pub mlp_layers: Vec<usize>,
    /// Dropout before each MLP layer (default 0.2)
    pub mlp_dropout: Option<f32>,
    /// Dropout before the output layer (default none)
    pub out_dropout: Option<f32>,
    #[serde(flatten)]
    pub embedding: TextEmbeddingConfig,
}

impl Default for BiGruRcnn2Config {
    fn default() -> Self {
        Self {
            lr: 1e-3,
            decay: 0.0,
            rnn_size: 128,
            rnn_dropout: None,
            rnn_dense_size: 64,
            mlp_layers: Vec::new(),
            mlp_dropout: Some(0.2),
            out_dropout: None,
            embedding: TextEmbeddingConfig::default(),
        }
    }
}

/// Any architecture, tagged by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "architecture")]
pub enum ArchitectureConfig {
    #[serde(rename = "cudnn_lstm_1")]
    CudnnLstm1(CudnnLstm1Config),
    #[serde(rename = "bigru_1")]
    BiGru1(BiGru1Config),
    #[serde(rename = "bigru_2")]
    BiGru2(BiGru2Config),
    #[serde(rename = "bigru_cnn_1")]
    BiGruCnn1(BiGruCnn1Config),
    #[serde(rename = "bigru_rcnn_1")]
    BiGruRcnn1(BiGruRcnn1Config),
    #[serde(rename = "bigru_rcnn_2")]
    BiGruRcnn2(BiGruRcnn2Config),
}

impl ArchitectureConfig {
    /// Default configuration of the named variant
    pub fn from_name(name: &str) -> UnifiedResult<Self> {
        let kind = ArchitectureKind::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| config_errors::unknown_architecture(name))?;
        Ok(Self::default_for(kind))
    }

    pub fn default_for(kind: ArchitectureKind) -> Self {
        match kind {
            ArchitectureKind::CudnnLstm1 => ArchitectureConfig::CudnnLstm1(Default::default()),
            ArchitectureKind::BiGru1 => ArchitectureConfig::BiGru1(Default::default()),
            ArchitectureKind::BiGru2 => ArchitectureConfig::BiGru2(Default::default()),
            ArchitectureKind::BiGruCnn1 => ArchitectureConfig::BiGruCnn1(Default::default()),
            ArchitectureKind::BiGruRcnn1 => ArchitectureConfig::BiGruRcnn1(Default::default()),
            ArchitectureKind::BiGruRcnn2 => ArchitectureConfig::BiGruRcnn2(Default::default()),
        }
    }

    pub fn kind(&self) -> ArchitectureKind {
        match self {
            ArchitectureConfig::CudnnLstm1(_) => ArchitectureKind::CudnnLstm1,
            ArchitectureConfig::BiGru1(_) => ArchitectureKind::BiGru1,
            ArchitectureConfig::BiGru2(_) => ArchitectureKind::BiGru2,
            ArchitectureConfig::BiGruCnn1(_) => ArchitectureKind::BiGruCnn1,
            ArchitectureConfig::BiGruRcnn1(_) => ArchitectureKind::BiGruRcnn1,
            ArchitectureConfig::BiGruRcnn2(_) => ArchitectureKind::BiGruRcnn2,
        }
    }

    pub fn optimizer(&self) -> OptimizerConfig {
        match self {
            ArchitectureConfig::CudnnLstm1(c) => OptimizerConfig::adam(c.lr, c.decay),
            ArchitectureConfig::BiGru1(c) => OptimizerConfig::adam(c.lr, c.decay),
            ArchitectureConfig::BiGru2(c) => OptimizerConfig::adam(c.lr, c.decay),
            ArchitectureConfig::BiGruCnn1(c) => OptimizerConfig::adam(c.lr, c.decay),
            ArchitectureConfig::BiGruRcnn1(c) => OptimizerConfig::adam(c.lr, c.decay),
            ArchitectureConfig::BiGruRcnn2(c) => OptimizerConfig::adam(c.lr, c.decay),
        }
    }
}
