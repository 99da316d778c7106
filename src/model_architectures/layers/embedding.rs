//! Token Embedding Construction
//!
//! Three ways an embedding table ends up in a model:
//! - pretrained and frozen: the matrix lives outside the `VarMap`, so the
//!   optimizer never sees it
//! - pretrained and trainable: the matrix is installed as a `Var` in the
//!   `VarMap` under `<name>.weight`
//! - random: uniform(-0.05, 0.05) initialisation, trainable, created
//!   through the `VarBuilder`

use crate::core::{concurrency_error, UnifiedResult};
use crate::validation_error;
use crate::data::dataset::DatasetDescriptor;
use crate::data::embedding_loader::{load_emb_matrix, EmbeddingLoadOptions};
use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{init::Init, Embedding, VarBuilder, VarMap};
use std::path::Path;
use tracing::debug;

const RANDOM_INIT_BOUND: f64 = 0.05;

/// Load the pretrained matrix for `data`'s vocabulary, if a file is given
pub fn load_pretrained(
    data: &DatasetDescriptor,
    file: Option<&Path>,
    dim: usize,
    rand_std: Option<f32>,
    device: &Device,
) -> UnifiedResult<Option<Tensor>> {
    let Some(path) = file else {
        return Ok(None);
    };
    let options = EmbeddingLoadOptions {
        rand_std,
        ..EmbeddingLoadOptions::default()
    };
    let matrix = load_emb_matrix(
        path,
        &data.text_tokenizer.word_index,
        data.text_voc_size,
        dim,
        &options,
    )?;
    Ok(Some(matrix.to_tensor(device)?))
}

/// Build an embedding table
///
/// `name` is the variable prefix used when the table is trainable.
pub fn text_embedding(
    varmap: &VarMap,
    name: &str,
    voc_size: usize,
    dim: usize,
    pretrained: Option<Tensor>,
    trainable: bool,
    device: &Device,
) -> UnifiedResult<Embedding> {
    let weights = match (pretrained, trainable) {
        (Some(matrix), false) => {
            debug!(name, voc_size, dim, "frozen pretrained embedding");
            matrix
        }
        (Some(matrix), true) => {
            debug!(name, voc_size, dim, "trainable pretrained embedding");
            install_var(varmap, &format!("{}.weight", name), &matrix)?
        }
        (None, true) => {
            let vb = VarBuilder::from_varmap(varmap, DType::F32, device);
            vb.pp(name).get_with_hints(
                (voc_size, dim),
                "weight",
                Init::Uniform {
                    lo: -RANDOM_INIT_BOUND,
                    up: RANDOM_INIT_BOUND,
                },
            )?
        }
        (None, false) => {
            return Err(validation_error!(
                "trainable",
                "true when no pretrained matrix is given",
                "false",
                name
            ))
        }
    };
    Ok(Embedding::new(weights, dim))
}

/// Register `value` as a trainable variable and return its tensor handle
fn install_var(varmap: &VarMap, name: &str, value: &Tensor) -> UnifiedResult<Tensor> {
    let var = Var::from_tensor(value)?;
    let tensor = var.as_tensor().clone();
    varmap
        .data()
        .lock()
        .map_err(|e| concurrency_error("embedding variable registration", &e.to_string()))?
        .insert(name.to_string(), var);
    Ok(tensor)
}
