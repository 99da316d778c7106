//! Sequence Pooling
//!
//! Reductions from per-timestep representations `[batch, seq_len, features]`
//! to fixed-width vectors `[batch, width]`.
//!
//! ## Recurrent readouts
//! - **FinalStates**: final forward and backward GRU states, concatenated
//! - **GlobalMax**: max over time of the bidirectional sequence
//! - **Sterby**: final states, global max and global average, concatenated

use crate::core::{config_errors, UnifiedError, UnifiedResult};
use crate::model_architectures::layers::recurrent::BiGruOutput;
use candle_core::{Result, Tensor};
use serde::{Deserialize, Serialize};

/// Max over the time dimension
///
/// `[batch, seq_len, features]` -> `[batch, features]`
pub fn global_max_pool(sequence: &Tensor) -> Result<Tensor> {
    sequence.max(1)
}

/// Mean over the time dimension
///
/// `[batch, seq_len, features]` -> `[batch, features]`
pub fn global_avg_pool(sequence: &Tensor) -> Result<Tensor> {
    sequence.mean(1)
}

/// Concatenation of global max and global average pooling
///
/// `[batch, seq_len, features]` -> `[batch, 2 * features]`
pub fn max_avg_pool(sequence: &Tensor) -> Result<Tensor> {
    Tensor::cat(
        &[global_max_pool(sequence)?, global_avg_pool(sequence)?],
        1,
    )
}

/// Readout strategy for the bidirectional GRU variants
///
/// Serialized as the optional string used in experiment configs:
/// `null`, `"gmp"`, `"sterby"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<String>", into = "Option<String>")]
pub enum RnnPooling {
    #[default]
    FinalStates,
    GlobalMax,
    Sterby,
}

impl RnnPooling {
    /// Parse a pooling name; `None` selects the final-state readout
    pub fn parse(name: Option<&str>) -> UnifiedResult<Self> {
        match name {
            None => Ok(RnnPooling::FinalStates),
            Some("gmp") => Ok(RnnPooling::GlobalMax),
            Some("sterby") => Ok(RnnPooling::Sterby),
            Some(other) => Err(config_errors::unknown_pooling(other)),
        }
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            RnnPooling::FinalStates => None,
            RnnPooling::GlobalMax => Some("gmp"),
            RnnPooling::Sterby => Some("sterby"),
        }
    }

    /// Width of the pooled vector for a GRU of `rnn_size` units per direction
    pub fn output_width(&self, rnn_size: usize) -> usize {
        match self {
            RnnPooling::FinalStates => 2 * rnn_size,
            RnnPooling::GlobalMax => 2 * rnn_size,
            RnnPooling::Sterby => 6 * rnn_size,
        }
    }

    /// Reduce an encoded sequence to `[batch, output_width]`
    pub fn reduce(&self, encoded: &BiGruOutput) -> Result<Tensor> {
        match self {
            RnnPooling::FinalStates => Tensor::cat(
                &[&encoded.forward_state, &encoded.backward_state],
                1,
            ),
            RnnPooling::GlobalMax => global_max_pool(&encoded.sequence),
            RnnPooling::Sterby => Tensor::cat(
                &[
                    encoded.forward_state.clone(),
                    encoded.backward_state.clone(),
                    global_max_pool(&encoded.sequence)?,
                    global_avg_pool(&encoded.sequence)?,
                ],
                1,
            ),
        }
    }
}

impl TryFrom<Option<String>> for RnnPooling {
    type Error = UnifiedError;

    fn try_from(value: Option<String>) -> UnifiedResult<Self> {
        RnnPooling::parse(value.as_deref())
    }
}

impl From<RnnPooling> for Option<String> {
    fn from(pooling: RnnPooling) -> Self {
        pooling.name().map(str::to_string)
    }
}
