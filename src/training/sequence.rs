//! Batch Sequences
//!
//! Indexable views over in-memory examples. Batch `i` gathers examples
//! `[i * batch_size, (i + 1) * batch_size)` of the current order and runs
//! them through the sequence's transform chain. The last batch may be
//! short.

use crate::core::UnifiedResult;
use crate::training::transform::Transform;
use crate::validation_error;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

fn check_batch_size(batch_size: usize) -> UnifiedResult<()> {
    if batch_size == 0 {
        return Err(validation_error!("batch_size", "> 0", batch_size));
    }
    Ok(())
}

fn num_batches(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size)
}

fn batch_range(i: usize, len: usize, batch_size: usize) -> UnifiedResult<std::ops::Range<usize>> {
    let batches = num_batches(len, batch_size);
    if i >= batches {
        return Err(validation_error!(
            "batch index",
            format!("< {}", batches),
            i
        ));
    }
    let start = i * batch_size;
    Ok(start..(start + batch_size).min(len))
}

/// Training batches of `(features, targets)`
pub struct DefaultTrainSequence<X, Y, XB, YB> {
    x: Vec<X>,
    y: Vec<Y>,
    batch_size: usize,
    order: Vec<usize>,
    x_transform: Arc<dyn Transform<Vec<X>, XB>>,
    y_transform: Arc<dyn Transform<Vec<Y>, YB>>,
}

impl<X: Clone, Y: Clone, XB, YB> DefaultTrainSequence<X, Y, XB, YB> {
    pub fn new(
        x: Vec<X>,
        y: Vec<Y>,
        batch_size: usize,
        x_transform: Arc<dyn Transform<Vec<X>, XB>>,
        y_transform: Arc<dyn Transform<Vec<Y>, YB>>,
    ) -> UnifiedResult<Self> {
        check_batch_size(batch_size)?;
        if x.len() != y.len() {
            return Err(validation_error!(
                "targets",
                format!("{} rows", x.len()),
                format!("{} rows", y.len()),
                "every example needs a target row"
            ));
        }
        let order = (0..x.len()).collect();
        Ok(Self {
            x,
            y,
            batch_size,
            order,
            x_transform,
            y_transform,
        })
    }

    /// Number of batches
    pub fn len(&self) -> usize {
        num_batches(self.x.len(), self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn num_examples(&self) -> usize {
        self.x.len()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Transformed batch `i`
    pub fn get(&self, i: usize) -> UnifiedResult<(XB, YB)> {
        let range = batch_range(i, self.x.len(), self.batch_size)?;
        let indices = &self.order[range];
        let x_batch: Vec<X> = indices.iter().map(|&j| self.x[j].clone()).collect();
        let y_batch: Vec<Y> = indices.iter().map(|&j| self.y[j].clone()).collect();
        Ok((
            self.x_transform.transform(x_batch)?,
            self.y_transform.transform(y_batch)?,
        ))
    }

    /// Draw a new example order
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.shuffle(rng);
    }
}

impl<X, Y, XB, YB> fmt::Debug for DefaultTrainSequence<X, Y, XB, YB> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultTrainSequence")
            .field("examples", &self.x.len())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

/// Prediction batches of features only, in input order
pub struct DefaultTestSequence<X, XB> {
    x: Vec<X>,
    batch_size: usize,
    x_transform: Arc<dyn Transform<Vec<X>, XB>>,
}

impl<X: Clone, XB> DefaultTestSequence<X, XB> {
    pub fn new(
        x: Vec<X>,
        batch_size: usize,
        x_transform: Arc<dyn Transform<Vec<X>, XB>>,
    ) -> UnifiedResult<Self> {
        check_batch_size(batch_size)?;
        Ok(Self {
            x,
            batch_size,
            x_transform,
        })
    }

    pub fn len(&self) -> usize {
        num_batches(self.x.len(), self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn num_examples(&self) -> usize {
        self.x.len()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn get(&self, i: usize) -> UnifiedResult<XB> {
        let range = batch_range(i, self.x.len(), self.batch_size)?;
        self.x_transform.transform(self.x[range].to_vec())
    }
}

impl<X, XB> fmt::Debug for DefaultTestSequence<X, XB> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultTestSequence")
            .field("examples", &self.x.len())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}
