//! Model Architecture Traits and Type Definitions

use candle_core::{DType, Tensor};
use std::fmt::Debug;

/// Name of the token-index input every architecture declares
pub const COMMENT_TEXT_INPUT: &str = "comment_text";

/// Name of the auxiliary numeric input, declared only when numeric columns exist
pub const NUMERIC_INPUT: &str = "numeric_columns__";

/// Width of the classification head
///
/// Every architecture emits exactly this many independent sigmoid units,
/// whatever `target_shape` the caller passes.
pub const NUM_LABELS: usize = 6;

/// Label order of the output vector
pub const LABEL_NAMES: [&str; NUM_LABELS] = [
    "toxic",
    "severe_toxic",
    "obscene",
    "threat",
    "insult",
    "identity_hate",
];

/// Architecture variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchitectureKind {
    /// Stacked bidirectional LSTM, global max pooling, MLP head
    CudnnLstm1,
    /// Bidirectional GRU with configurable readout
    BiGru1,
    /// BiGRU over fixed + free embeddings, projected numeric branch
    BiGru2,
    /// BiGRU followed by a width-2 convolution
    BiGruCnn1,
    /// Recurrent-convolutional: BiGRU sequence joined with the embeddings
    BiGruRcnn1,
    /// Recurrent-convolutional with explicit causal left/right contexts
    BiGruRcnn2,
}

impl ArchitectureKind {
    pub const ALL: [ArchitectureKind; 6] = [
        ArchitectureKind::CudnnLstm1,
        ArchitectureKind::BiGru1,
        ArchitectureKind::BiGru2,
        ArchitectureKind::BiGruCnn1,
        ArchitectureKind::BiGruRcnn1,
        ArchitectureKind::BiGruRcnn2,
    ];

    /// Registry name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            ArchitectureKind::CudnnLstm1 => "cudnn_lstm_1",
            ArchitectureKind::BiGru1 => "bigru_1",
            ArchitectureKind::BiGru2 => "bigru_2",
            ArchitectureKind::BiGruCnn1 => "bigru_cnn_1",
            ArchitectureKind::BiGruRcnn1 => "bigru_rcnn_1",
            ArchitectureKind::BiGruRcnn2 => "bigru_rcnn_2",
        }
    }
}

/// Final activation of the output layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputActivation {
    Sigmoid,
}

/// Declared model input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub name: &'static str,
    /// Per-example shape (batch dimension excluded)
    pub shape: Vec<usize>,
    pub dtype: DType,
}

/// One batch of model inputs
///
/// - `comment_text`: token indices `[batch, max_text_len]`, dtype U32
/// - `numeric`: auxiliary features `[batch, num_numeric_columns]`, dtype F32
#[derive(Debug, Clone)]
pub struct ModelInputs {
    pub comment_text: Tensor,
    pub numeric: Option<Tensor>,
}

impl ModelInputs {
    pub fn batch_size(&self) -> candle_core::Result<usize> {
        self.comment_text.dim(0)
    }

    /// Numeric input, or an error naming the missing input
    pub fn require_numeric(&self) -> candle_core::Result<&Tensor> {
        self.numeric.as_ref().ok_or_else(|| {
            candle_core::Error::Msg(format!("missing model input '{}'", NUMERIC_INPUT))
        })
    }
}

/// A built network that maps inputs to label logits
///
/// Implementations return pre-sigmoid logits `[batch, NUM_LABELS]`; the
/// compiled model applies the sigmoid for prediction and uses the logits
/// directly for the binary cross-entropy loss.
pub trait TextClassifierNetwork: Debug + Send + Sync {
    fn kind(&self) -> ArchitectureKind;

    fn forward(&self, inputs: &ModelInputs, train: bool) -> candle_core::Result<Tensor>;
}
