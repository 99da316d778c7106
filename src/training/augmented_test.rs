//! Tests for augmented models

use super::augmented::*;
use super::config::TrainingConfig;
use super::features::{Comment, LabelRow};
use super::rnn_classifier::*;
use super::transform::*;
use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::config::{ArchitectureConfig, BiGru1Config, TextEmbeddingConfig};
use crate::test_fixtures::fixtures::*;
use candle_core::Device;
use rstest::*;
use serial_test::serial;
use std::sync::Arc;

fn append(suffix: &'static str) -> Augmentation<String> {
    Arc::new(FnTransform::new(
        suffix,
        move |batch: Vec<String>| -> UnifiedResult<Vec<String>> {
            Ok(batch.into_iter().map(|s| s + suffix).collect())
        },
    ))
}

/// Base model whose features are the examples with "F" appended
#[derive(Debug, Default)]
struct RecordingModel {
    seen: Vec<String>,
}

impl SequenceBuilder for RecordingModel {
    type Input = String;
    type Target = u32;
    type Features = Vec<String>;
    type Labels = Vec<u32>;

    fn feature_transformer(&self) -> Arc<dyn Transform<Vec<String>, Vec<String>>> {
        append("F")
    }

    fn target_transformer(&self) -> Arc<dyn Transform<Vec<u32>, Vec<u32>>> {
        Arc::new(FnTransform::new(
            "targets",
            |y: Vec<u32>| -> UnifiedResult<Vec<u32>> { Ok(y) },
        ))
    }
}

impl TrainableModel for RecordingModel {
    type Prediction = String;

    fn fit_sequence(
        &mut self,
        sequence: TrainSequence<Self>,
        config: &TrainingConfig,
    ) -> UnifiedResult<TrainingHistory> {
        let mut history = TrainingHistory::default();
        for _ in 0..config.epochs {
            for i in 0..sequence.len() {
                let (features, _) = sequence.get(i)?;
                self.seen.extend(features);
            }
            history.epoch_losses.push(0.0);
        }
        Ok(history)
    }

    fn predict_sequence(&self, sequence: &TestSequence<Self>) -> UnifiedResult<Vec<String>> {
        let mut out = Vec::new();
        for i in 0..sequence.len() {
            out.extend(sequence.get(i)?);
        }
        Ok(out)
    }
}

fn one_epoch() -> TrainingConfig {
    TrainingConfig {
        epochs: 1,
        batch_size: 2,
        shuffle: false,
        ..TrainingConfig::default()
    }
}

/// Augmentations run in order on raw examples, the feature transformer last
#[rstest]
fn test_augmented_train_order() {
    let mut model = AugmentedModel::new(
        RecordingModel::default(),
        vec![append("a"), append("b")],
        Vec::new(),
    );
    assert_eq!(model.train_augmentations().len(), 2);
    assert!(model.predict_augmentations().is_empty());

    let x = vec!["x".to_string(), "y".to_string(), "z".to_string()];
    model.fit(x, vec![0, 1, 0], &one_epoch()).unwrap();

    assert_eq!(model.base().seen, vec!["xabF", "yabF", "zabF"]);
}

#[rstest]
fn test_augmented_predict_uses_predict_augmentations() {
    let model = AugmentedModel::new(
        RecordingModel::default(),
        vec![append("t")],
        vec![append("p"), append("q")],
    );
    let out = model.predict(vec!["x".to_string(), "y".to_string()], 1).unwrap();
    assert_eq!(out, vec!["xpqF", "ypqF"]);
}

/// With no augmentations the wrapper behaves like the base model
#[rstest]
fn test_augmented_without_steps_matches_base() {
    let base_out = RecordingModel::default()
        .predict(vec!["x".to_string()], 4)
        .unwrap();
    let wrapped = AugmentedModel::new(RecordingModel::default(), Vec::new(), Vec::new());
    assert_eq!(wrapped.predict(vec!["x".to_string()], 4).unwrap(), base_out);
    assert_eq!(wrapped.train_transform().len(), 1);

    let mut base = wrapped.into_base();
    base.fit(vec!["y".to_string()], vec![1], &one_epoch()).unwrap();
    assert_eq!(base.seen, vec!["yF"]);
}

/// Lowercasing augmentation in front of a real classifier
#[rstest]
#[serial]
fn test_augmented_rnn_classifier(
    small_dataset: DatasetDescriptor,
    sample_comments: Vec<Comment>,
    sample_labels: Vec<LabelRow>,
) {
    let lowercase: Augmentation<Comment> = Arc::new(FnTransform::new(
        "lowercase",
        |batch: Vec<Comment>| -> UnifiedResult<Vec<Comment>> {
            Ok(batch
                .into_iter()
                .map(|c| Comment {
                    text: c.text.to_lowercase(),
                    ..c
                })
                .collect())
        },
    ));
    let config = ArchitectureConfig::BiGru1(BiGru1Config {
        rnn_size: 4,
        embedding: TextEmbeddingConfig {
            text_emb_size: 8,
            ..TextEmbeddingConfig::default()
        },
        ..BiGru1Config::default()
    });
    let base = RnnClassifier::new(config, small_dataset, Device::Cpu);
    let mut model = AugmentedModel::new(base, vec![lowercase], Vec::new());

    let history = model
        .fit(sample_comments.clone(), sample_labels, &one_epoch())
        .unwrap();
    assert_eq!(history.epoch_losses.len(), 1);
    assert!(model.base().model().is_some());

    let predictions = model.predict(sample_comments, 3).unwrap();
    assert_eq!(predictions.len(), 8);
    assert!(predictions.iter().flatten().all(|p| (0.0..=1.0).contains(p)));
}
