//! Pretrained Embedding Loader
//!
//! Builds a `[voc_size, dim]` lookup matrix from a text vectors file
//! (GloVe / fastText `.vec` layout: `token v1 v2 ... vd` per line, with an
//! optional `count dim` header line).
//!
//! Row `i` holds the file's vector for the token whose index is `i`. Rows
//! for tokens missing from the file are drawn from `Normal(0, rand_std)`
//! with a seeded generator when `rand_std` is set, and are zero otherwise.

use crate::core::{model_errors, ConfigErrorType, UnifiedError, UnifiedResult};
use candle_core::{Device, Tensor};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Options for filling rows missing from the vectors file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingLoadOptions {
    /// Standard deviation of the random rows; `None` leaves them at zero
    pub rand_std: Option<f32>,
    /// Seed for the random rows
    pub seed: u64,
}

impl Default for EmbeddingLoadOptions {
    fn default() -> Self {
        Self {
            rand_std: None,
            seed: 42,
        }
    }
}

/// Dense row-major embedding matrix
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    voc_size: usize,
    dim: usize,
    values: Vec<f32>,
    found: usize,
}

impl EmbeddingMatrix {
    pub fn voc_size(&self) -> usize {
        self.voc_size
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows taken from the file
    pub fn found(&self) -> usize {
        self.found
    }

    pub fn row(&self, index: usize) -> &[f32] {
        &self.values[index * self.dim..(index + 1) * self.dim]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn to_tensor(&self, device: &Device) -> UnifiedResult<Tensor> {
        Ok(Tensor::from_vec(
            self.values.clone(),
            (self.voc_size, self.dim),
            device,
        )?)
    }
}

/// Load a pretrained embedding matrix for `word_index`
///
/// Fails on unreadable files and on lines whose vector is not `dim`
/// numbers wide.
pub fn load_emb_matrix(
    path: &Path,
    word_index: &HashMap<String, u32>,
    voc_size: usize,
    dim: usize,
    options: &EmbeddingLoadOptions,
) -> UnifiedResult<EmbeddingMatrix> {
    let path_str = path.to_string_lossy().to_string();
    let file = File::open(path).map_err(|e| UnifiedError::IO {
        operation: "open embedding file".to_string(),
        path: Some(path_str.clone()),
        source: e,
    })?;

    let mut values = initial_values(voc_size, dim, options)?;
    let mut filled = vec![false; voc_size];
    let mut found = 0usize;

    for (line_idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line.map_err(|e| UnifiedError::IO {
            operation: "read embedding file".to_string(),
            path: Some(path_str.clone()),
            source: e,
        })?;
        let mut parts = line.split_whitespace();
        let Some(token) = parts.next() else {
            continue;
        };
        let fields: Vec<&str> = parts.collect();

        // A `count dim` header only when it cannot be a `dim`-wide vector line
        if line_no == 1 && fields.len() != dim && is_header(token, &fields) {
            continue;
        }
        if fields.len() != dim {
            return Err(model_errors::malformed_embedding_file(
                &path_str,
                line_no,
                &format!("expected {} values, found {}", dim, fields.len()),
            ));
        }
        let vector = fields
            .iter()
            .map(|f| f.parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| model_errors::malformed_embedding_file(&path_str, line_no, &e.to_string()))?;

        let Some(&index) = word_index.get(token) else {
            continue;
        };
        let index = index as usize;
        if index >= voc_size || filled[index] {
            continue;
        }
        values[index * dim..(index + 1) * dim].copy_from_slice(&vector);
        filled[index] = true;
        found += 1;
    }

    info!(
        path = %path_str,
        found,
        voc_size,
        dim,
        "loaded pretrained embedding matrix"
    );

    Ok(EmbeddingMatrix {
        voc_size,
        dim,
        values,
        found,
    })
}

fn is_header(first: &str, rest: &[&str]) -> bool {
    rest.len() == 1 && first.parse::<usize>().is_ok() && rest[0].parse::<usize>().is_ok()
}

fn initial_values(
    voc_size: usize,
    dim: usize,
    options: &EmbeddingLoadOptions,
) -> UnifiedResult<Vec<f32>> {
    let Some(std) = options.rand_std else {
        return Ok(vec![0.0; voc_size * dim]);
    };
    let normal = Normal::new(0.0f32, std).map_err(|e| UnifiedError::Configuration {
        operation: "embedding random init".to_string(),
        source: ConfigErrorType::InvalidData(format!("rand_std {}: {}", std, e)),
        context: None,
    })?;
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    Ok((0..voc_size * dim).map(|_| normal.sample(&mut rng)).collect())
}
