//! Adam with time-based learning-rate decay
//!
//! The effective learning rate after `n` updates is `lr / (1 + decay * n)`.
//! The update itself is candle's AdamW with the weight-decay term disabled,
//! which is plain Adam.

use crate::core::{ErrorUnification, ModelErrorType, UnifiedResult};
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use serde::{Deserialize, Serialize};

/// Adam hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub lr: f64,
    pub beta_1: f64,
    pub beta_2: f64,
    pub epsilon: f64,
    /// Learning-rate decay per update
    pub decay: f64,
}

impl OptimizerConfig {
    /// Adam with the fixed stability constants and the given rate and decay
    pub fn adam(lr: f64, decay: f64) -> Self {
        Self {
            lr,
            beta_1: 0.9,
            beta_2: 0.999,
            epsilon: 1e-8,
            decay,
        }
    }

    pub fn learning_rate_at(&self, iterations: usize) -> f64 {
        self.lr / (1.0 + self.decay * iterations as f64)
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::adam(1e-3, 0.0)
    }
}

/// Stateful optimizer over a fixed set of trainable variables
pub struct DecayingAdam {
    inner: AdamW,
    config: OptimizerConfig,
    iterations: usize,
}

impl std::fmt::Debug for DecayingAdam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecayingAdam")
            .field("config", &self.config)
            .field("iterations", &self.iterations)
            .finish()
    }
}

impl DecayingAdam {
    pub fn new(vars: Vec<Var>, config: OptimizerConfig) -> UnifiedResult<Self> {
        let params = ParamsAdamW {
            lr: config.lr,
            beta1: config.beta_1,
            beta2: config.beta_2,
            eps: config.epsilon,
            weight_decay: 0.0,
        };
        let inner = AdamW::new(vars, params).with_model_context(
            ModelErrorType::Optimizer,
            "optimizer construction",
            None,
        )?;
        Ok(Self {
            inner,
            config,
            iterations: 0,
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn current_learning_rate(&self) -> f64 {
        self.config.learning_rate_at(self.iterations)
    }

    /// Backpropagate `loss` and apply one update at the decayed rate
    pub fn backward_step(&mut self, loss: &Tensor) -> UnifiedResult<()> {
        self.inner.set_learning_rate(self.current_learning_rate());
        self.inner.backward_step(loss).with_model_context(
            ModelErrorType::Optimizer,
            "optimizer step",
            Some(&format!("iteration {}", self.iterations)),
        )?;
        self.iterations += 1;
        Ok(())
    }
}
