//! Dense Layers, Dropout and Classification Heads
//!
//! ## Building blocks
//! - `DenseLayer`: linear map plus activation, applied to the last dimension
//!   (so it also works per-timestep on `[batch, seq_len, features]`)
//! - `spatial_dropout_1d`: drops whole feature channels across a sequence
//! - `MlpStack`: repeated dense layers with dropout before or after each one
//! - `NumericBranch`: optional projection of the auxiliary numeric input
//! - `ClassificationHead`: optional dropout followed by the 6-unit output layer

use crate::model_architectures::traits::NUM_LABELS;
use candle_core::{DType, Result, Tensor};
use candle_nn::{Dropout, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

/// Activation function for dense layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenseActivation {
    /// f(x) = x
    #[default]
    #[serde(alias = "linear")]
    Identity,
    /// f(x) = max(0, x)
    Relu,
    /// f(x) = tanh(x)
    Tanh,
    /// f(x) = 1 / (1 + exp(-x))
    Sigmoid,
}

impl DenseActivation {
    /// Apply activation function element-wise
    pub fn apply(&self, input: &Tensor) -> Result<Tensor> {
        match self {
            DenseActivation::Identity => Ok(input.clone()),
            DenseActivation::Relu => input.relu(),
            DenseActivation::Tanh => input.tanh(),
            DenseActivation::Sigmoid => candle_nn::ops::sigmoid(input),
        }
    }
}

/// Dense linear layer with activation
///
/// - Input: `[..., in_features]`
/// - Output: `[..., out_features]`
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub(crate) linear: Linear,
    pub(crate) activation: DenseActivation,
    pub(crate) in_features: usize,
    pub(crate) out_features: usize,
}

impl DenseLayer {
    /// Create a freshly initialised trainable layer under `vb`
    pub fn new(
        in_features: usize,
        out_features: usize,
        activation: DenseActivation,
        vb: VarBuilder,
    ) -> Result<Self> {
        Ok(Self {
            linear: candle_nn::linear(in_features, out_features, vb)?,
            activation,
            in_features,
            out_features,
        })
    }

    pub fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let output = self.linear.forward(input)?;
        self.activation.apply(&output)
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }
}

/// Spatial dropout over `[batch, seq_len, channels]`
///
/// One keep/drop decision per (example, channel), shared across all
/// timesteps. Identity at inference time or when `rate` is zero.
pub fn spatial_dropout_1d(x: &Tensor, rate: f32, train: bool) -> Result<Tensor> {
    if !train || rate <= 0.0 {
        return Ok(x.clone());
    }
    if rate >= 1.0 {
        return x.zeros_like();
    }
    let (batch, _seq_len, channels) = x.dims3()?;
    let keep = Tensor::rand(0f32, 1f32, (batch, 1, channels), x.device())?
        .ge(rate as f64)?
        .to_dtype(x.dtype())?;
    let mask = (keep * (1.0 / (1.0 - rate as f64)))?;
    x.broadcast_mul(&mask)
}

/// Where dropout sits relative to each dense layer of an MLP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropoutPlacement {
    Before,
    After,
}

/// Stack of dense layers with interleaved dropout
#[derive(Debug, Clone)]
pub struct MlpStack {
    layers: Vec<DenseLayer>,
    dropout: Option<Dropout>,
    placement: DropoutPlacement,
    out_features: usize,
}

impl MlpStack {
    pub fn new(
        in_features: usize,
        sizes: &[usize],
        activation: DenseActivation,
        dropout: Option<f32>,
        placement: DropoutPlacement,
        vb: VarBuilder,
    ) -> Result<Self> {
        let mut layers = Vec::with_capacity(sizes.len());
        let mut width = in_features;
        for (idx, &size) in sizes.iter().enumerate() {
            layers.push(DenseLayer::new(width, size, activation, vb.pp(idx.to_string()))?);
            width = size;
        }
        Ok(Self {
            layers,
            dropout: dropout.map(Dropout::new),
            placement,
            out_features: width,
        })
    }

    /// Width after the last layer (the input width if the stack is empty)
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn forward(&self, x: &Tensor, train: bool) -> Result<Tensor> {
        let mut out = x.clone();
        for layer in &self.layers {
            if self.placement == DropoutPlacement::Before {
                out = apply_dropout(&self.dropout, &out, train)?;
            }
            out = layer.forward(&out)?;
            if self.placement == DropoutPlacement::After {
                out = apply_dropout(&self.dropout, &out, train)?;
            }
        }
        Ok(out)
    }
}

fn apply_dropout(dropout: &Option<Dropout>, x: &Tensor, train: bool) -> Result<Tensor> {
    match dropout {
        Some(d) => d.forward(x, train),
        None => Ok(x.clone()),
    }
}

/// Treatment of the `numeric_columns__` input before concatenation
#[derive(Debug, Clone)]
pub enum NumericBranch {
    /// Concatenate the raw numeric features
    Passthrough { width: usize },
    /// Project through a relu dense layer first
    Projected(DenseLayer),
}

impl NumericBranch {
    pub fn passthrough(num_columns: usize) -> Self {
        NumericBranch::Passthrough { width: num_columns }
    }

    pub fn projected(num_columns: usize, size: usize, vb: VarBuilder) -> Result<Self> {
        Ok(NumericBranch::Projected(DenseLayer::new(
            num_columns,
            size,
            DenseActivation::Relu,
            vb,
        )?))
    }

    /// Width contributed to the concatenated representation
    pub fn out_features(&self) -> usize {
        match self {
            NumericBranch::Passthrough { width } => *width,
            NumericBranch::Projected(layer) => layer.out_features(),
        }
    }

    pub fn forward(&self, numeric: &Tensor) -> Result<Tensor> {
        let numeric = numeric.to_dtype(DType::F32)?;
        match self {
            NumericBranch::Passthrough { .. } => Ok(numeric),
            NumericBranch::Projected(layer) => layer.forward(&numeric),
        }
    }

    /// Join the pooled representation with the numeric features
    pub fn concat(&self, pooled: &Tensor, numeric: &Tensor) -> Result<Tensor> {
        Tensor::cat(&[pooled.clone(), self.forward(numeric)?], 1)
    }
}

/// Optional dropout followed by a dense layer producing `NUM_LABELS` logits
#[derive(Debug, Clone)]
pub struct ClassificationHead {
    dropout: Option<Dropout>,
    output: Linear,
}

impl ClassificationHead {
    pub fn new(in_features: usize, dropout: Option<f32>, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            dropout: dropout.map(Dropout::new),
            output: candle_nn::linear(in_features, NUM_LABELS, vb)?,
        })
    }

    /// Returns pre-sigmoid logits `[batch, NUM_LABELS]`
    pub fn forward(&self, x: &Tensor, train: bool) -> Result<Tensor> {
        let x = apply_dropout(&self.dropout, x, train)?;
        self.output.forward(&x)
    }
}
