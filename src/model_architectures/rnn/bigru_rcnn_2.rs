//! Recurrent-convolutional classifier with explicit causal contexts
//!
//! ```text
//! comment_text -> Embedding -> SpatialDropout = e
//!   left[t]  = GRU over e[0..t]      (excludes t)
//!   right[t] = GRU over e[t+1..]     (excludes t, runs backwards)
//!   [left | e | right] -> per-timestep Dense(rnn_dense_size, tanh)
//!   -> [GlobalMax | GlobalAvg] (+ numeric_columns__)
//!   -> [Dropout -> Dense] x len(mlp_layers) -> Dropout? -> Dense(6, sigmoid)
//! ```

use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::{declare_inputs, CompiledModel};
use crate::model_architectures::config::BiGruRcnn2Config;
use crate::model_architectures::layers::dense::{
    spatial_dropout_1d, ClassificationHead, DenseActivation, DenseLayer, DropoutPlacement,
    MlpStack, NumericBranch,
};
use crate::model_architectures::layers::embedding::{load_pretrained, text_embedding};
use crate::model_architectures::layers::pooling::max_avg_pool;
use crate::model_architectures::layers::recurrent::CausalBiGru;
use crate::model_architectures::optimizer::OptimizerConfig;
use crate::model_architectures::rnn::{
    check_target_shape, join_numeric, passthrough_numeric, with_numeric_width,
};
use crate::model_architectures::traits::{ArchitectureKind, ModelInputs, TextClassifierNetwork};
use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{Embedding, Module, VarBuilder, VarMap};

#[derive(Debug)]
pub struct BiGruRcnn2 {
    embedding: Embedding,
    emb_dropout: f32,
    context: CausalBiGru,
    rnn_dropout: Option<f32>,
    projection: DenseLayer,
    numeric: Option<NumericBranch>,
    mlp: MlpStack,
    head: ClassificationHead,
}

impl TextClassifierNetwork for BiGruRcnn2 {
    fn kind(&self) -> ArchitectureKind {
        ArchitectureKind::BiGruRcnn2
    }

    fn forward(&self, inputs: &ModelInputs, train: bool) -> Result<Tensor> {
        let emb = self.embedding.forward(&inputs.comment_text)?;
        let emb = spatial_dropout_1d(&emb, self.emb_dropout, train)?;

        let (mut left, mut right) = self.context.forward(&emb)?;
        if let Some(rate) = self.rnn_dropout {
            left = spatial_dropout_1d(&left, rate, train)?;
            right = spatial_dropout_1d(&right, rate, train)?;
        }

        let seq = self
            .projection
            .forward(&Tensor::cat(&[left, emb, right], 2)?)?;

        let out = join_numeric(max_avg_pool(&seq)?, &self.numeric, inputs)?;
        let out = self.mlp.forward(&out, train)?;
        self.head.forward(&out, train)
    }
}

/// Build and compile `bigru_rcnn_2`
pub fn bigru_rcnn_2(
    data: &DatasetDescriptor,
    target_shape: &[usize],
    config: &BiGruRcnn2Config,
    device: &Device,
) -> UnifiedResult<CompiledModel> {
    check_target_shape(ArchitectureKind::BiGruRcnn2, target_shape);

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

    let context = CausalBiGru::new(emb_cfg.text_emb_size, config.rnn_size, vb.pp("context"))?;
    let projection = DenseLayer::new(
        emb_cfg.text_emb_size + 2 * context.hidden_size(),
        config.rnn_dense_size,
        DenseActivation::Tanh,
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

    let network = BiGruRcnn2 {
        embedding,
        emb_dropout: emb_cfg.text_emb_dropout,
        context,
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
