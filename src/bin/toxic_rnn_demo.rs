//! Toxic comment classifier demo.
//!
//! Trains one of the recurrent architectures on a small built-in corpus
//! and prints per-label probabilities for a few unseen comments.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin toxic-rnn-demo -- --architecture bigru_rcnn_2 --epochs 5
//!
//! # Architecture and training loop from an experiment file
//! cargo run --bin toxic-rnn-demo -- --config experiment.json --save weights.safetensors
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use candle_toxic_rnn::core::{init_logging, ExperimentConfig, UnifiedConfigLoader};
use candle_toxic_rnn::model_architectures::LABEL_NAMES;
use candle_toxic_rnn::training::{Comment, LabelRow, RnnClassifier, TrainableModel};
use candle_toxic_rnn::{ArchitectureConfig, DatasetDescriptor, TrainingConfig};

#[derive(Parser, Debug)]
#[command(name = "toxic-rnn-demo")]
#[command(about = "Train a recurrent toxic comment classifier on a toy corpus")]
struct Args {
    /// Experiment JSON with `model` and `training` sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Architecture to train with its default settings (ignored with --config).
    #[arg(long, default_value = "bigru_1")]
    architecture: String,

    /// Override the number of epochs.
    #[arg(long)]
    epochs: Option<usize>,

    /// Override the batch size.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Token sequence length.
    #[arg(long, default_value = "20")]
    max_text_len: usize,

    /// Vocabulary cap.
    #[arg(long, default_value = "2000")]
    max_features: usize,

    /// Write trained weights as safetensors.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

const CORPUS: [(&str, LabelRow); 10] = [
    ("Thank you for the helpful edit on this article", [0.0; 6]),
    ("You are an idiot and your edits are garbage", [1.0, 0.0, 1.0, 0.0, 1.0, 0.0]),
    ("Please cite a reliable source for this claim", [0.0; 6]),
    ("I am going to find you and hurt you", [1.0, 1.0, 0.0, 1.0, 0.0, 0.0]),
    ("Nice work on the references, much appreciated", [0.0; 6]),
    ("Shut up you pathetic moron", [1.0, 0.0, 1.0, 0.0, 1.0, 0.0]),
    ("The infobox needs an update after the merge", [0.0; 6]),
    ("Your people are disgusting and should leave", [1.0, 0.0, 0.0, 0.0, 1.0, 1.0]),
    ("Could you explain the revert on the talk page?", [0.0; 6]),
    ("Get lost, nobody wants your stupid opinion", [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
];

const UNSEEN: [&str; 3] = [
    "thanks for the quick fix",
    "you are a stupid moron",
    "i will hurt you",
];

fn load_experiment(args: &Args) -> Result<ExperimentConfig> {
    let mut experiment = match &args.config {
        Some(path) => UnifiedConfigLoader::load_experiment_config(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ExperimentConfig {
            model: ArchitectureConfig::from_name(&args.architecture)?,
            training: TrainingConfig {
                batch_size: 4,
                epochs: 3,
                ..TrainingConfig::default()
            },
        },
    };
    if let Some(epochs) = args.epochs {
        experiment.training.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        experiment.training.batch_size = batch_size;
    }
    Ok(experiment)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let experiment = load_experiment(&args)?;
    let (comments, labels): (Vec<Comment>, Vec<LabelRow>) = CORPUS
        .iter()
        .map(|(text, label)| (Comment::new(*text), *label))
        .unzip();

    let texts: Vec<&str> = CORPUS.iter().map(|(text, _)| *text).collect();
    let data = DatasetDescriptor::fit(&texts, Vec::new(), args.max_text_len, args.max_features);
    info!(
        architecture = experiment.model.kind().name(),
        text_voc_size = data.text_voc_size,
        max_text_len = data.max_text_len,
        examples = comments.len(),
        "training demo classifier"
    );

    let device = experiment.training.device();
    let mut classifier = RnnClassifier::new(experiment.model, data, device);
    let history = classifier.fit(comments, labels, &experiment.training)?;
    info!(epoch_losses = ?history.epoch_losses, "training finished");

    let unseen: Vec<Comment> = UNSEEN.iter().map(|t| Comment::new(*t)).collect();
    let predictions = classifier.predict(unseen, UNSEEN.len())?;
    for (text, row) in UNSEEN.iter().zip(&predictions) {
        let scores: Vec<String> = LABEL_NAMES
            .iter()
            .zip(row)
            .map(|(name, p)| format!("{}={:.3}", name, p))
            .collect();
        info!(comment = *text, scores = %scores.join(" "), "prediction");
    }

    if let Some(path) = &args.save {
        if let Some(model) = classifier.model() {
            model.save(path)?;
            info!(path = %path.display(), "saved weights");
        }
    }
    Ok(())
}
