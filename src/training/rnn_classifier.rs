//! Trainable Classifier
//!
//! `RnnClassifier` ties an architecture config and a dataset descriptor
//! to the comment feature and label transformers, builds the compiled
//! model on the first `fit`, and runs the epoch loop.
//!
//! `SequenceBuilder` is the seam for wrappers: it decides how raw
//! examples become batch sequences, and `TrainableModel::fit`/`predict`
//! always go through it.

use crate::core::{model_errors, processing_errors, UnifiedResult};
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::CompiledModel;
use crate::model_architectures::config::ArchitectureConfig;
use crate::model_architectures::model_factory::ModelFactory;
use crate::model_architectures::traits::{ModelInputs, NUM_LABELS};
use crate::training::config::TrainingConfig;
use crate::training::features::{Comment, CommentFeatureTransformer, LabelRow, LabelTransformer};
use crate::training::sequence::{DefaultTestSequence, DefaultTrainSequence};
use crate::training::transform::Transform;
use crate::validation_error;
use candle_core::{Device, Tensor};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, info};

/// Training batches produced for model `M`
pub type TrainSequence<M> = DefaultTrainSequence<
    <M as SequenceBuilder>::Input,
    <M as SequenceBuilder>::Target,
    <M as SequenceBuilder>::Features,
    <M as SequenceBuilder>::Labels,
>;

/// Prediction batches produced for model `M`
pub type TestSequence<M> =
    DefaultTestSequence<<M as SequenceBuilder>::Input, <M as SequenceBuilder>::Features>;

/// How raw examples become batch sequences
pub trait SequenceBuilder {
    type Input: Clone + 'static;
    type Target: Clone + 'static;
    type Features: 'static;
    type Labels: 'static;

    fn feature_transformer(&self) -> Arc<dyn Transform<Vec<Self::Input>, Self::Features>>;

    fn target_transformer(&self) -> Arc<dyn Transform<Vec<Self::Target>, Self::Labels>>;

    fn build_train_sequence(
        &self,
        x: Vec<Self::Input>,
        y: Vec<Self::Target>,
        batch_size: usize,
    ) -> UnifiedResult<TrainSequence<Self>>
    where
        Self: Sized,
    {
        DefaultTrainSequence::new(
            x,
            y,
            batch_size,
            self.feature_transformer(),
            self.target_transformer(),
        )
    }

    fn build_test_sequence(
        &self,
        x: Vec<Self::Input>,
        batch_size: usize,
    ) -> UnifiedResult<TestSequence<Self>>
    where
        Self: Sized,
    {
        DefaultTestSequence::new(x, batch_size, self.feature_transformer())
    }
}

/// Mean training loss of every epoch, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub epoch_losses: Vec<f32>,
}

impl TrainingHistory {
    pub fn last_loss(&self) -> Option<f32> {
        self.epoch_losses.last().copied()
    }
}

/// A model that trains and predicts over the sequences it builds
pub trait TrainableModel: SequenceBuilder + Sized {
    type Prediction;

    fn fit_sequence(
        &mut self,
        sequence: TrainSequence<Self>,
        config: &TrainingConfig,
    ) -> UnifiedResult<TrainingHistory>;

    fn predict_sequence(&self, sequence: &TestSequence<Self>)
        -> UnifiedResult<Vec<Self::Prediction>>;

    fn fit(
        &mut self,
        x: Vec<Self::Input>,
        y: Vec<Self::Target>,
        config: &TrainingConfig,
    ) -> UnifiedResult<TrainingHistory> {
        let sequence = self.build_train_sequence(x, y, config.batch_size)?;
        self.fit_sequence(sequence, config)
    }

    /// One prediction per example, in input order
    fn predict(
        &self,
        x: Vec<Self::Input>,
        batch_size: usize,
    ) -> UnifiedResult<Vec<Self::Prediction>> {
        let sequence = self.build_test_sequence(x, batch_size)?;
        self.predict_sequence(&sequence)
    }
}

/// Comment classifier over one of the recurrent architectures
#[derive(Debug)]
pub struct RnnClassifier {
    config: ArchitectureConfig,
    data: Arc<DatasetDescriptor>,
    device: Device,
    model: Option<CompiledModel>,
}

impl RnnClassifier {
    pub fn new(config: ArchitectureConfig, data: DatasetDescriptor, device: Device) -> Self {
        Self {
            config,
            data: Arc::new(data),
            device,
            model: None,
        }
    }

    pub fn config(&self) -> &ArchitectureConfig {
        &self.config
    }

    pub fn data(&self) -> &DatasetDescriptor {
        &self.data
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The compiled model, once `fit` or `build` has run
    pub fn model(&self) -> Option<&CompiledModel> {
        self.model.as_ref()
    }

    /// Build the compiled model if it does not exist yet
    pub fn build(&mut self) -> UnifiedResult<&mut CompiledModel> {
        if self.model.is_none() {
            let model = ModelFactory::build(&self.config, &self.data, &[NUM_LABELS], &self.device)?;
            self.model = Some(model);
        }
        self.model
            .as_mut()
            .ok_or_else(|| model_errors::not_built("build"))
    }
}

impl SequenceBuilder for RnnClassifier {
    type Input = Comment;
    type Target = LabelRow;
    type Features = ModelInputs;
    type Labels = Tensor;

    fn feature_transformer(&self) -> Arc<dyn Transform<Vec<Comment>, ModelInputs>> {
        Arc::new(CommentFeatureTransformer::new(
            Arc::clone(&self.data),
            self.device.clone(),
        ))
    }

    fn target_transformer(&self) -> Arc<dyn Transform<Vec<LabelRow>, Tensor>> {
        Arc::new(LabelTransformer::new(self.device.clone()))
    }
}

impl TrainableModel for RnnClassifier {
    type Prediction = LabelRow;

    fn fit_sequence(
        &mut self,
        mut sequence: TrainSequence<Self>,
        config: &TrainingConfig,
    ) -> UnifiedResult<TrainingHistory> {
        if sequence.is_empty() {
            return Err(processing_errors::empty_input("fit"));
        }
        let architecture = self.config.kind().name();
        let model = self.build()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut history = TrainingHistory::default();

        for epoch in 0..config.epochs {
            if config.shuffle {
                sequence.shuffle(&mut rng);
            }
            let mut total = 0.0f32;
            for i in 0..sequence.len() {
                let (inputs, targets) = sequence.get(i)?;
                let loss = model.train_on_batch(&inputs, &targets)?;
                debug!(epoch = epoch + 1, batch = i, loss, "trained batch");
                total += loss;
            }
            let mean_loss = total / sequence.len() as f32;
            info!(
                architecture,
                epoch = epoch + 1,
                epochs = config.epochs,
                loss = mean_loss,
                lr = model.optimizer().current_learning_rate(),
                "epoch finished"
            );
            history.epoch_losses.push(mean_loss);
        }
        Ok(history)
    }

    fn predict_sequence(&self, sequence: &TestSequence<Self>) -> UnifiedResult<Vec<LabelRow>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| model_errors::not_built("predict"))?;

        let mut predictions = Vec::with_capacity(sequence.num_examples());
        for i in 0..sequence.len() {
            let inputs = sequence.get(i)?;
            let probs = model
                .predict(&inputs)
                .and_then(|p| Ok(p.to_vec2::<f32>()?))
                .map_err(|e| processing_errors::batch_processing(sequence.batch_size(), &e.to_string()))?;
            for row in probs {
                let width = row.len();
                let row: LabelRow = row.try_into().map_err(|_| {
                    validation_error!("prediction width", NUM_LABELS, width)
                })?;
                predictions.push(row);
            }
        }
        Ok(predictions)
    }
}
