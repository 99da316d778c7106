//! # Layer Building Blocks
//!
//! Recurrent encoders, pooling readouts, dense stacks and embedding
//! construction shared by the architecture builders.

pub mod dense;
pub mod embedding;
pub mod pooling;
pub mod recurrent;

// Test modules
#[cfg(test)]
pub mod dense_test;
#[cfg(test)]
pub mod recurrent_test;
