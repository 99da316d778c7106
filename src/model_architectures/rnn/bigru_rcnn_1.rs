//! Recurrent-convolutional classifier
//!
//! ```text
//! comment_text -> Embedding -> SpatialDropout ─┬─────────────────────────┐
//!                                              └─ BiGRU -> SpatialDropout? ┤
//!   [embedding | bigru] -> per-timestep Dense(rnn_dense_size, activation)
//!   -> [GlobalMax | GlobalAvg] (+ numeric_columns__)
//!   -> [Dropout -> Dense] x len(mlp_layers) -> Dropout? -> Dense(6, sigmoid)
//! ```

use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::{declare_inputs, CompiledModel};
use crate::model_architectures::config::BiGruRcnn1Config;
use crate::model_architectures::layers::dense::{
    spatial_dropout_1d, ClassificationHead, DenseActivation, DenseLayer, DropoutPlacement,
    MlpStack, NumericBranch,
};
use crate::model_architectures::layers::embedding::{load_pretrained, text_embedding};
use crate::model_architectures::layers::pooling::max_avg_pool;
use crate::model_architectures::layers::recurrent::BiGru;
use crate::model_architectures::optimizer::OptimizerConfig;
use crate::model_architectures::rnn::{
    check_target_shape, join_numeric, passthrough_numeric, with_numeric_width,
};
use crate::model_architectures::traits::{ArchitectureKind, ModelInputs, TextClassifierNetwork};
use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{Embedding, Module, VarBuilder, VarMap};

#[derive(Debug)]
pub struct BiGruRcnn1 {
    embedding: Embedding,
    emb_dropout: f32,
    rnn: BiGru,
    rnn_dropout: Option<f32>,
    projection: DenseLayer,
    numeric: Option<NumericBranch>,
    mlp: MlpStack,
    head: ClassificationHead,
}

impl TextClassifierNetwork for BiGruRcnn1 {
    fn kind(&self) -> ArchitectureKind {
        ArchitectureKind::BiGruRcnn1
    }

    fn forward(&self, inputs: &ModelInputs, train: bool) -> Result<Tensor> {
        let emb = self.embedding.forward(&inputs.comment_text)?;
        let emb = spatial_dropout_1d(&emb, self.emb_dropout, train)?;

        let mut seq = self.rnn.forward(&emb)?.sequence;
        if let Some(rate) = self.rnn_dropout {
            seq = spatial_dropout_1d(&seq, rate, train)?;
        }

        let seq = self.projection.forward(&Tensor::cat(&[emb, seq], 2)?)?;

        let out = join_numeric(max_avg_pool(&seq)?, &self.numeric, inputs)?;
        let out = self.mlp.forward(&out, train)?;
        self.head.forward(&out, train)
    }
}

/// Build and compile `bigru_rcnn_1`
pub fn bigru_rcnn_1(
    data: &DatasetDescriptor,
    target_shape: &[usize],
    config: &BiGruRcnn1Config,
    device: &Device,
) -> UnifiedResult<CompiledModel> {
    check_target_shape(ArchitectureKind::BiGruRcnn1, target_shape);

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

    let emb_cfg = &config.embedding;
    let pretrained = load_pretrained(
        data,
        emb_cfg.text_emb_file.as_deref(),
        emb_cfg.text_emb_size,
        emb_cfg.text_emb_rand_std,
        device,
    )?;
    let embedding = text_embedding(
        &varmap,
        "embedding",
        data.text_voc_size,
        emb_cfg.text_emb_size,
        pretrained,
        emb_cfg.trainable(),
        device,
    )?;

    let rnn = BiGru::new(emb_cfg.text_emb_size, config.rnn_size, vb.pp("bigru"))?;
    let projection = DenseLayer::new(
        emb_cfg.text_emb_size + rnn.output_size(),
        config.rnn_dense_size,
        config.rnn_dense_activation,
        vb.pp("projection"),
    )?;
    let numeric = passthrough_numeric(data);
    let mlp = MlpStack::new(
        with_numeric_width(2 * config.rnn_dense_size, &numeric),
        &config.mlp_layers,
        DenseActivation::Identity,
        config.mlp_dropout,
        DropoutPlacement::Before,
        vb.pp("mlp"),
    )?;
    let head = ClassificationHead::new(mlp.out_features(), config.out_dropout, vb.pp("output"))?;

    let network = BiGruRcnn1 {
        embedding,
        emb_dropout: emb_cfg.text_emb_dropout,
        rnn,
        rnn_dropout: config.rnn_dropout,
        projection,
        numeric,
        mlp,
        head,
    };

    CompiledModel::compile(
        Box::new(network),
        varmap,
        declare_inputs(data),
        OptimizerConfig::adam(config.lr, config.decay),
        device.clone(),
    )
}
