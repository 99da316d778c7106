//! Tests for the decaying Adam optimizer

use super::optimizer::*;
use crate::test_fixtures::fixtures::*;
use candle_core::{Device, Tensor, Var};
use rstest::*;

#[rstest]
#[case(0, 1e-3)]
#[case(100, 1e-3 / 1.1)]
#[case(1000, 1e-3 / 2.0)]
fn test_optimizer_learning_rate_decay(#[case] iterations: usize, #[case] expected: f64) {
    let config = OptimizerConfig::adam(1e-3, 0.001);
    assert!((config.learning_rate_at(iterations) - expected).abs() < 1e-12);
}

#[rstest]
fn test_optimizer_zero_decay_is_constant() {
    let config = OptimizerConfig::default();
    assert_eq!(config.learning_rate_at(0), config.learning_rate_at(1_000_000));
}

/// Steps count iterations and reduce a simple quadratic loss
#[rstest]
fn test_optimizer_backward_step(cpu_device: Device) {
    let w = Var::new(&[2f32, -3.0], &cpu_device).unwrap();
    let mut optimizer =
        DecayingAdam::new(vec![w.clone()], OptimizerConfig::adam(0.1, 0.5)).unwrap();

    let loss_of = |w: &Var| -> Tensor { w.as_tensor().sqr().unwrap().sum_all().unwrap() };
    let before = loss_of(&w).to_scalar::<f32>().unwrap();

    for _ in 0..5 {
        optimizer.backward_step(&loss_of(&w)).unwrap();
    }
    let after = loss_of(&w).to_scalar::<f32>().unwrap();

    assert_eq!(optimizer.iterations(), 5);
    assert!((optimizer.current_learning_rate() - 0.1 / 3.5).abs() < 1e-12);
    assert!(after < before, "loss should drop: {} -> {}", before, after);
}
