//! Recurrent Encoders
//!
//! Bidirectional GRU/LSTM encoders over `[batch, seq_len, features]` inputs,
//! plus the causal shift primitives used by the RCNN context encoder.
//!
//! The backward direction is computed by reversing time, running a
//! forward recurrence, and reversing the produced sequence back, so that
//! position `t` of every output lines up with position `t` of the input.

use candle_core::{Result, Tensor};
use candle_nn::{GRUConfig, LSTMConfig, VarBuilder, GRU, LSTM, RNN};

/// Reverse a `[batch, seq_len, features]` tensor along time
pub fn reverse_time(x: &Tensor) -> Result<Tensor> {
    let seq_len = x.dim(1)?;
    let rev_idx: Vec<u32> = (0..seq_len as u32).rev().collect();
    let rev_idx = Tensor::new(rev_idx.as_slice(), x.device())?;
    x.contiguous()?.index_select(&rev_idx, 1)
}

/// Shift a sequence one step towards the future
///
/// `output[t] = x[t - 1]` and `output[0] = 0`. A recurrence over the result
/// has seen only timesteps strictly before `t` when it emits position `t`.
pub fn shift_forward(x: &Tensor) -> Result<Tensor> {
    let (batch, seq_len, features) = x.dims3()?;
    let pad = Tensor::zeros((batch, 1, features), x.dtype(), x.device())?;
    if seq_len <= 1 {
        return x.zeros_like();
    }
    Tensor::cat(&[pad, x.narrow(1, 0, seq_len - 1)?], 1)
}

/// Shift a sequence one step towards the past
///
/// `output[t] = x[t + 1]` and `output[seq_len - 1] = 0`.
pub fn shift_backward(x: &Tensor) -> Result<Tensor> {
    let (batch, seq_len, features) = x.dims3()?;
    let pad = Tensor::zeros((batch, 1, features), x.dtype(), x.device())?;
    if seq_len <= 1 {
        return x.zeros_like();
    }
    Tensor::cat(&[x.narrow(1, 1, seq_len - 1)?, pad], 1)
}

/// Run a GRU over time and return the stacked hidden states plus the last one
fn run_gru(gru: &GRU, x: &Tensor) -> Result<(Tensor, Tensor)> {
    let states = gru.seq(&x.contiguous()?)?;
    let last = states
        .last()
        .ok_or_else(|| candle_core::Error::Msg("GRU over an empty sequence".to_string()))?
        .h()
        .clone();
    // `GRU::states_to_tensor` concatenates along features, so stack on time here
    let hidden: Vec<Tensor> = states.iter().map(|s| s.h().clone()).collect();
    Ok((Tensor::stack(&hidden, 1)?, last))
}

/// Outputs of a bidirectional GRU
#[derive(Debug, Clone)]
pub struct BiGruOutput {
    /// `[batch, seq_len, 2 * hidden]`, forward features first
    pub sequence: Tensor,
    /// Forward state after the last timestep `[batch, hidden]`
    pub forward_state: Tensor,
    /// Backward state after the first timestep `[batch, hidden]`
    pub backward_state: Tensor,
}

/// Bidirectional GRU
#[derive(Debug, Clone)]
pub struct BiGru {
    forward: GRU,
    backward: GRU,
    hidden_size: usize,
}

impl BiGru {
    pub fn new(input_size: usize, hidden_size: usize, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            forward: candle_nn::gru(
                input_size,
                hidden_size,
                GRUConfig::default(),
                vb.pp("forward"),
            )?,
            backward: candle_nn::gru(
                input_size,
                hidden_size,
                GRUConfig::default(),
                vb.pp("backward"),
            )?,
            hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Width of the concatenated sequence output
    pub fn output_size(&self) -> usize {
        2 * self.hidden_size
    }

    pub fn forward(&self, x: &Tensor) -> Result<BiGruOutput> {
        let (fwd_seq, forward_state) = run_gru(&self.forward, x)?;
        let (bwd_rev_seq, backward_state) = run_gru(&self.backward, &reverse_time(x)?)?;
        let bwd_seq = reverse_time(&bwd_rev_seq)?;

        Ok(BiGruOutput {
            sequence: Tensor::cat(&[fwd_seq, bwd_seq], 2)?,
            forward_state,
            backward_state,
        })
    }
}

/// Bidirectional LSTM returning the full sequence
#[derive(Debug, Clone)]
pub struct BiLstm {
    forward: LSTM,
    backward: LSTM,
    hidden_size: usize,
}

impl BiLstm {
    pub fn new(input_size: usize, hidden_size: usize, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            forward: candle_nn::lstm(
                input_size,
                hidden_size,
                LSTMConfig::default(),
                vb.pp("forward"),
            )?,
            backward: candle_nn::lstm(
                input_size,
                hidden_size,
                LSTMConfig::default(),
                vb.pp("backward"),
            )?,
            hidden_size,
        })
    }

    pub fn output_size(&self) -> usize {
        2 * self.hidden_size
    }

    /// `[batch, seq_len, input]` -> `[batch, seq_len, 2 * hidden]`
    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = x.contiguous()?;
        let fwd_states = self.forward.seq(&x)?;
        let fwd = self.forward.states_to_tensor(&fwd_states)?;

        let bwd_states = self.backward.seq(&reverse_time(&x)?)?;
        let bwd = reverse_time(&self.backward.states_to_tensor(&bwd_states)?)?;

        Tensor::cat(&[fwd, bwd], 2)
    }
}

/// Left and right context encoder
///
/// Two independent unidirectional GRUs. The left context at position `t`
/// summarises `x[0..t]` (exclusive of `t`); the right context summarises
/// `x[t+1..]`. Both outputs are `[batch, seq_len, hidden]`.
#[derive(Debug, Clone)]
pub struct CausalBiGru {
    left: GRU,
    right: GRU,
    hidden_size: usize,
}

impl CausalBiGru {
    pub fn new(input_size: usize, hidden_size: usize, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            left: candle_nn::gru(input_size, hidden_size, GRUConfig::default(), vb.pp("left"))?,
            right: candle_nn::gru(input_size, hidden_size, GRUConfig::default(), vb.pp("right"))?,
            hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Returns `(left_context, right_context)`
    pub fn forward(&self, x: &Tensor) -> Result<(Tensor, Tensor)> {
        let (left, _) = run_gru(&self.left, &shift_forward(x)?)?;

        let right_input = reverse_time(&shift_backward(x)?)?;
        let (right_rev, _) = run_gru(&self.right, &right_input)?;
        let right = reverse_time(&right_rev)?;

        Ok((left, right))
    }
}
