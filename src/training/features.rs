//! Feature and Target Transformers
//!
//! Turn raw comment batches into `ModelInputs` and label rows into the
//! `[batch, NUM_LABELS]` target tensor.

use crate::core::{processing_errors, ErrorUnification, UnifiedResult};
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::traits::{ModelInputs, NUM_LABELS};
use crate::training::transform::Transform;
use candle_core::{Device, Tensor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One label vector in `LABEL_NAMES` order
pub type LabelRow = [f32; NUM_LABELS];

/// A raw example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    /// Values of the descriptor's numeric columns, in column order
    #[serde(default)]
    pub numeric: Vec<f32>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            numeric: Vec::new(),
        }
    }

    pub fn with_numeric(text: impl Into<String>, numeric: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            numeric,
        }
    }
}

/// `Vec<Comment>` -> `ModelInputs`
///
/// The numeric input is built only when the descriptor lists numeric
/// columns. Its width is not checked here; a wrong number of values
/// fails when the tensor is assembled.
#[derive(Debug, Clone)]
pub struct CommentFeatureTransformer {
    data: Arc<DatasetDescriptor>,
    device: Device,
}

impl CommentFeatureTransformer {
    pub fn new(data: Arc<DatasetDescriptor>, device: Device) -> Self {
        Self { data, device }
    }
}

impl Transform<Vec<Comment>, ModelInputs> for CommentFeatureTransformer {
    fn transform(&self, input: Vec<Comment>) -> UnifiedResult<ModelInputs> {
        if input.is_empty() {
            return Err(processing_errors::empty_input("comment feature transform"));
        }
        let batch = input.len();
        let max_len = self.data.max_text_len;

        let tokens: Vec<u32> = input
            .iter()
            .flat_map(|c| self.data.encode_text(&c.text))
            .collect();
        let comment_text = Tensor::from_vec(tokens, (batch, max_len), &self.device)
            .with_processing_context("comment_text tensor", Some(&format!("batch: {}", batch)))?;

        let numeric = if self.data.has_numeric_columns() {
            let width = self.data.num_numeric_columns();
            let values: Vec<f32> = input.iter().flat_map(|c| c.numeric.iter().copied()).collect();
            Some(
                Tensor::from_vec(values, (batch, width), &self.device).with_processing_context(
                    "numeric_columns__ tensor",
                    Some(&format!("batch: {}, columns: {}", batch, width)),
                )?,
            )
        } else {
            None
        };

        Ok(ModelInputs {
            comment_text,
            numeric,
        })
    }
}

/// `Vec<LabelRow>` -> `[batch, NUM_LABELS]` f32 tensor
#[derive(Debug, Clone)]
pub struct LabelTransformer {
    device: Device,
}

impl LabelTransformer {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl Transform<Vec<LabelRow>, Tensor> for LabelTransformer {
    fn transform(&self, input: Vec<LabelRow>) -> UnifiedResult<Tensor> {
        if input.is_empty() {
            return Err(processing_errors::empty_input("label transform"));
        }
        let batch = input.len();
        let values: Vec<f32> = input.into_iter().flatten().collect();
        Ok(Tensor::from_vec(values, (batch, NUM_LABELS), &self.device)?)
    }
}
