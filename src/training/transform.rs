//! Batch Transforms
//!
//! A `Transform` maps one batch to another. `MultiStep` chains a list of
//! same-typed steps in front of a final, type-changing step: augmentations
//! run on raw examples and the feature transformer always runs last.

use crate::core::UnifiedResult;
use std::fmt;
use std::sync::Arc;

/// A batch-level transformation
pub trait Transform<I, O>: Send + Sync {
    fn transform(&self, input: I) -> UnifiedResult<O>;
}

/// Adapter turning a closure into a `Transform`
pub struct FnTransform<F> {
    name: &'static str,
    func: F,
}

impl<F> FnTransform<F> {
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform").field("name", &self.name).finish()
    }
}

impl<I, O, F> Transform<I, O> for FnTransform<F>
where
    F: Fn(I) -> UnifiedResult<O> + Send + Sync,
{
    fn transform(&self, input: I) -> UnifiedResult<O> {
        (self.func)(input)
    }
}

/// `last(steps[n-1](...steps[0](x)))`
pub struct MultiStep<I, O> {
    steps: Vec<Arc<dyn Transform<I, I>>>,
    last: Arc<dyn Transform<I, O>>,
}

impl<I, O> MultiStep<I, O> {
    pub fn new(steps: Vec<Arc<dyn Transform<I, I>>>, last: Arc<dyn Transform<I, O>>) -> Self {
        Self { steps, last }
    }

    /// A chain with no leading steps
    pub fn single(last: Arc<dyn Transform<I, O>>) -> Self {
        Self::new(Vec::new(), last)
    }

    /// Number of steps including the final one
    pub fn len(&self) -> usize {
        self.steps.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<I, O> Clone for MultiStep<I, O> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            last: Arc::clone(&self.last),
        }
    }
}

impl<I, O> fmt::Debug for MultiStep<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiStep")
            .field("steps", &self.len())
            .finish()
    }
}

impl<I, O> Transform<I, O> for MultiStep<I, O> {
    fn transform(&self, input: I) -> UnifiedResult<O> {
        let mut current = input;
        for step in &self.steps {
            current = step.transform(current)?;
        }
        self.last.transform(current)
    }
}
