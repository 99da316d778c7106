//! Compiled Model
//!
//! A built network together with its trainable variables, its optimizer
//! and the inputs it declares. The loss is binary cross-entropy averaged
//! over the `NUM_LABELS` independent outputs and the batch.

use crate::core::{model_errors, ErrorUnification, UnifiedResult};
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::optimizer::{DecayingAdam, OptimizerConfig};
use crate::model_architectures::traits::{
    ArchitectureKind, InputSpec, ModelInputs, OutputActivation, TextClassifierNetwork,
    COMMENT_TEXT_INPUT, NUMERIC_INPUT, NUM_LABELS,
};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarMap;
use std::path::Path;
use tracing::info;

/// Inputs declared for `data`: `comment_text`, then `numeric_columns__` if any
pub fn declare_inputs(data: &DatasetDescriptor) -> Vec<InputSpec> {
    let mut inputs = vec![InputSpec {
        name: COMMENT_TEXT_INPUT,
        shape: vec![data.max_text_len],
        dtype: DType::U32,
    }];
    if data.has_numeric_columns() {
        inputs.push(InputSpec {
            name: NUMERIC_INPUT,
            shape: vec![data.num_numeric_columns()],
            dtype: DType::F32,
        });
    }
    inputs
}

/// Mean binary cross-entropy computed from logits
///
/// Uses `max(x, 0) - x * t + ln(1 + exp(-|x|))`, which stays finite when
/// the sigmoid saturates in f32.
pub fn binary_cross_entropy_with_logits(
    logits: &Tensor,
    targets: &Tensor,
) -> candle_core::Result<Tensor> {
    let positive_part = logits.relu()?;
    let cross = (logits * targets)?;
    let soft_tail = (logits.abs()?.neg()?.exp()? + 1.0)?.log()?;
    ((positive_part - cross)? + soft_tail)?.mean_all()
}

/// A trainable, compiled classifier
pub struct CompiledModel {
    network: Box<dyn TextClassifierNetwork>,
    varmap: VarMap,
    optimizer: DecayingAdam,
    inputs: Vec<InputSpec>,
    device: Device,
}

impl std::fmt::Debug for CompiledModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledModel")
            .field("network", &self.network)
            .field("optimizer", &self.optimizer)
            .field("inputs", &self.inputs)
            .finish()
    }
}

impl CompiledModel {
    /// Attach the optimizer to every variable registered in `varmap`
    pub fn compile(
        network: Box<dyn TextClassifierNetwork>,
        varmap: VarMap,
        inputs: Vec<InputSpec>,
        optimizer: OptimizerConfig,
        device: Device,
    ) -> UnifiedResult<Self> {
        let optimizer = DecayingAdam::new(varmap.all_vars(), optimizer)?;
        let model = Self {
            network,
            varmap,
            optimizer,
            inputs,
            device,
        };
        info!(
            architecture = model.kind().name(),
            trainable_parameters = model.trainable_parameter_count(),
            inputs = ?model.inputs.iter().map(|i| i.name).collect::<Vec<_>>(),
            lr = model.optimizer.config().lr,
            "compiled model"
        );
        Ok(model)
    }

    pub fn kind(&self) -> ArchitectureKind {
        self.network.kind()
    }

    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    pub fn output_shape(&self) -> [usize; 1] {
        [NUM_LABELS]
    }

    pub fn output_activation(&self) -> OutputActivation {
        OutputActivation::Sigmoid
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn optimizer(&self) -> &DecayingAdam {
        &self.optimizer
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn trainable_parameter_count(&self) -> usize {
        self.varmap.all_vars().iter().map(|v| v.elem_count()).sum()
    }

    /// Pre-sigmoid outputs `[batch, NUM_LABELS]`
    pub fn forward_logits(&self, inputs: &ModelInputs, train: bool) -> UnifiedResult<Tensor> {
        Ok(self.network.forward(inputs, train)?)
    }

    /// Independent per-label probabilities `[batch, NUM_LABELS]`
    pub fn predict(&self, inputs: &ModelInputs) -> UnifiedResult<Tensor> {
        let logits = self.forward_logits(inputs, false)?;
        Ok(candle_nn::ops::sigmoid(&logits)?)
    }

    /// Mean binary cross-entropy of `inputs` against `targets` without updating
    pub fn evaluate(&self, inputs: &ModelInputs, targets: &Tensor) -> UnifiedResult<f32> {
        let loss = self.loss(inputs, targets, false)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    /// One optimizer update; returns the batch loss before the update
    pub fn train_on_batch(&mut self, inputs: &ModelInputs, targets: &Tensor) -> UnifiedResult<f32> {
        let loss = self.loss(inputs, targets, true)?;
        self.optimizer.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    fn loss(&self, inputs: &ModelInputs, targets: &Tensor, train: bool) -> UnifiedResult<Tensor> {
        let logits = self.forward_logits(inputs, train)?;
        let targets = targets.to_dtype(DType::F32)?;
        binary_cross_entropy_with_logits(&logits, &targets)
            .with_processing_context("binary cross-entropy", None)
    }

    /// Save trainable weights as safetensors
    ///
    /// Frozen pretrained embeddings are not part of the checkpoint; they are
    /// rebuilt from the embedding file when the model is constructed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> UnifiedResult<()> {
        let path = path.as_ref();
        self.varmap
            .save(path)
            .map_err(|e| model_errors::checkpoint_failure(&path.to_string_lossy(), &e.to_string()))
    }

    /// Load trainable weights saved by `save` from an identically configured model
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> UnifiedResult<()> {
        let path = path.as_ref();
        self.varmap
            .load(path)
            .map_err(|e| model_errors::checkpoint_failure(&path.to_string_lossy(), &e.to_string()))
    }
}
