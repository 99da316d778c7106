//! Augmented Model
//!
//! Wraps a trainable model with ordered augmentation steps. Training
//! batches run `train_augmentations` and then the base feature
//! transformer; prediction batches run `predict_augmentations` and then
//! the feature transformer. Augmentations therefore always see raw
//! examples, never transformed features.

use crate::core::UnifiedResult;
use crate::training::config::TrainingConfig;
use crate::training::rnn_classifier::{
    SequenceBuilder, TestSequence, TrainSequence, TrainableModel, TrainingHistory,
};
use crate::training::sequence::{DefaultTestSequence, DefaultTrainSequence};
use crate::training::transform::{MultiStep, Transform};
use std::fmt;
use std::sync::Arc;

/// One augmentation over a batch of raw examples
pub type Augmentation<X> = Arc<dyn Transform<Vec<X>, Vec<X>>>;

pub struct AugmentedModel<M: SequenceBuilder> {
    base: M,
    train_augmentations: Vec<Augmentation<M::Input>>,
    predict_augmentations: Vec<Augmentation<M::Input>>,
}

impl<M: SequenceBuilder> AugmentedModel<M> {
    pub fn new(
        base: M,
        train_augmentations: Vec<Augmentation<M::Input>>,
        predict_augmentations: Vec<Augmentation<M::Input>>,
    ) -> Self {
        Self {
            base,
            train_augmentations,
            predict_augmentations,
        }
    }

    pub fn base(&self) -> &M {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut M {
        &mut self.base
    }

    pub fn into_base(self) -> M {
        self.base
    }

    pub fn train_augmentations(&self) -> &[Augmentation<M::Input>] {
        &self.train_augmentations
    }

    pub fn predict_augmentations(&self) -> &[Augmentation<M::Input>] {
        &self.predict_augmentations
    }

    /// Training feature chain: augmentations, then the base transformer
    pub fn train_transform(&self) -> MultiStep<Vec<M::Input>, M::Features> {
        MultiStep::new(
            self.train_augmentations.clone(),
            self.base.feature_transformer(),
        )
    }

    /// Prediction feature chain: augmentations, then the base transformer
    pub fn predict_transform(&self) -> MultiStep<Vec<M::Input>, M::Features> {
        MultiStep::new(
            self.predict_augmentations.clone(),
            self.base.feature_transformer(),
        )
    }
}

impl<M: SequenceBuilder + fmt::Debug> fmt::Debug for AugmentedModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AugmentedModel")
            .field("base", &self.base)
            .field("train_augmentations", &self.train_augmentations.len())
            .field("predict_augmentations", &self.predict_augmentations.len())
            .finish()
    }
}

impl<M: SequenceBuilder> SequenceBuilder for AugmentedModel<M> {
    type Input = M::Input;
    type Target = M::Target;
    type Features = M::Features;
    type Labels = M::Labels;

    fn feature_transformer(&self) -> Arc<dyn Transform<Vec<Self::Input>, Self::Features>> {
        self.base.feature_transformer()
    }

    fn target_transformer(&self) -> Arc<dyn Transform<Vec<Self::Target>, Self::Labels>> {
        self.base.target_transformer()
    }

    fn build_train_sequence(
        &self,
        x: Vec<Self::Input>,
        y: Vec<Self::Target>,
        batch_size: usize,
    ) -> UnifiedResult<TrainSequence<Self>> {
        DefaultTrainSequence::new(
            x,
            y,
            batch_size,
            Arc::new(self.train_transform()),
            self.base.target_transformer(),
        )
    }

    fn build_test_sequence(
        &self,
        x: Vec<Self::Input>,
        batch_size: usize,
    ) -> UnifiedResult<TestSequence<Self>> {
        DefaultTestSequence::new(x, batch_size, Arc::new(self.predict_transform()))
    }
}

impl<M: TrainableModel> TrainableModel for AugmentedModel<M> {
    type Prediction = M::Prediction;

    fn fit_sequence(
        &mut self,
        sequence: TrainSequence<Self>,
        config: &TrainingConfig,
    ) -> UnifiedResult<TrainingHistory> {
        self.base.fit_sequence(sequence, config)
    }

    fn predict_sequence(
        &self,
        sequence: &TestSequence<Self>,
    ) -> UnifiedResult<Vec<Self::Prediction>> {
        self.base.predict_sequence(sequence)
    }
}
