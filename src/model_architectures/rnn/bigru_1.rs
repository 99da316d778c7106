//! Bidirectional GRU classifier with a selectable readout
//!
//! ```text
//! comment_text -> Embedding -> SpatialDropout -> BiGRU(seq, fwd_state, bwd_state)
//!   -> RnnPooling readout (+ numeric_columns__)
//!   -> Dropout -> Dense(6, sigmoid)
//! ```

use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::{declare_inputs, CompiledModel};
use crate::model_architectures::config::BiGru1Config;
use crate::model_architectures::layers::dense::{
    spatial_dropout_1d, ClassificationHead, NumericBranch,
};
use crate::model_architectures::layers::embedding::{load_pretrained, text_embedding};
use crate::model_architectures::layers::pooling::RnnPooling;
use crate::model_architectures::layers::recurrent::BiGru;
use crate::model_architectures::optimizer::OptimizerConfig;
use crate::model_architectures::rnn::{
    check_target_shape, join_numeric, passthrough_numeric, with_numeric_width,
};
use crate::model_architectures::traits::{ArchitectureKind, ModelInputs, TextClassifierNetwork};
use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{Embedding, Module, VarBuilder, VarMap};

#[derive(Debug)]
pub struct BiGru1 {
    embedding: Embedding,
    emb_dropout: f32,
    rnn: BiGru,
    pooling: RnnPooling,
    numeric: Option<NumericBranch>,
    head: ClassificationHead,
}

impl TextClassifierNetwork for BiGru1 {
    fn kind(&self) -> ArchitectureKind {
        ArchitectureKind::BiGru1
    }

    fn forward(&self, inputs: &ModelInputs, train: bool) -> Result<Tensor> {
        let emb = self.embedding.forward(&inputs.comment_text)?;
        let emb = spatial_dropout_1d(&emb, self.emb_dropout, train)?;

        let encoded = self.rnn.forward(&emb)?;
        let out = join_numeric(self.pooling.reduce(&encoded)?, &self.numeric, inputs)?;
        self.head.forward(&out, train)
    }
}

/// Build and compile `bigru_1`
pub fn bigru_1(
    data: &DatasetDescriptor,
    target_shape: &[usize],
    config: &BiGru1Config,
    device: &Device,
) -> UnifiedResult<CompiledModel> {
    check_target_shape(ArchitectureKind::BiGru1, target_shape);

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
    let numeric = passthrough_numeric(data);
    let head = ClassificationHead::new(
        with_numeric_width(config.rnn_pooling.output_width(config.rnn_size), &numeric),
        Some(config.out_dropout),
        vb.pp("output"),
    )?;

    let network = BiGru1 {
        embedding,
        emb_dropout: emb_cfg.text_emb_dropout,
        rnn,
        pooling: config.rnn_pooling,
        numeric,
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
