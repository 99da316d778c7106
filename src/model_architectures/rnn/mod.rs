//! # Recurrent Architecture Builders
//!
//! Each builder reads a `DatasetDescriptor` and a variant config, assembles
//! the network, registers its variables and returns a `CompiledModel`.
//!
//! Shared contract:
//! - input `comment_text` `[max_text_len]`, plus `numeric_columns__`
//!   `[k]` when the descriptor lists `k > 0` numeric columns
//! - output: `NUM_LABELS` sigmoid units, independent of `target_shape`
//! - pretrained embeddings are frozen unless the config asks otherwise

pub mod bigru_1;
pub mod bigru_2;
pub mod bigru_cnn_1;
pub mod bigru_rcnn_1;
pub mod bigru_rcnn_2;
pub mod cudnn_lstm_1;

pub use bigru_1::{bigru_1, BiGru1};
pub use bigru_2::{bigru_2, BiGru2};
pub use bigru_cnn_1::{bigru_cnn_1, BiGruCnn1};
pub use bigru_rcnn_1::{bigru_rcnn_1, BiGruRcnn1};
pub use bigru_rcnn_2::{bigru_rcnn_2, BiGruRcnn2};
pub use cudnn_lstm_1::{cudnn_lstm_1, CudnnLstm1};

use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::layers::dense::NumericBranch;
use crate::model_architectures::traits::{ArchitectureKind, ModelInputs, NUM_LABELS};
use candle_core::{Result, Tensor};
use candle_nn::VarBuilder;
use tracing::warn;

/// The output width is fixed; a different `target_shape` is only reported
pub(crate) fn check_target_shape(kind: ArchitectureKind, target_shape: &[usize]) {
    if target_shape != [NUM_LABELS] {
        warn!(
            architecture = kind.name(),
            ?target_shape,
            output_width = NUM_LABELS,
            "target_shape ignored; output layer is fixed"
        );
    }
}

/// Raw numeric branch when the descriptor has numeric columns
pub(crate) fn passthrough_numeric(data: &DatasetDescriptor) -> Option<NumericBranch> {
    data.has_numeric_columns()
        .then(|| NumericBranch::passthrough(data.num_numeric_columns()))
}

/// Relu-projected numeric branch when the descriptor has numeric columns
pub(crate) fn projected_numeric(
    data: &DatasetDescriptor,
    size: usize,
    vb: VarBuilder,
) -> Result<Option<NumericBranch>> {
    if !data.has_numeric_columns() {
        return Ok(None);
    }
    Ok(Some(NumericBranch::projected(
        data.num_numeric_columns(),
        size,
        vb,
    )?))
}

/// Width of the representation after the optional numeric concatenation
pub(crate) fn with_numeric_width(pooled_width: usize, numeric: &Option<NumericBranch>) -> usize {
    pooled_width + numeric.as_ref().map_or(0, NumericBranch::out_features)
}

/// Concatenate the numeric branch onto `pooled` if the model declares it
pub(crate) fn join_numeric(
    pooled: Tensor,
    numeric: &Option<NumericBranch>,
    inputs: &ModelInputs,
) -> Result<Tensor> {
    match numeric {
        Some(branch) => branch.concat(&pooled, inputs.require_numeric()?),
        None => Ok(pooled),
    }
}
