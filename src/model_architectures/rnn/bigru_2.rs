//! Bidirectional GRU over a fixed + free embedding pair
//!
//! ```text
//! comment_text -> [FixedEmbedding | FreeEmbedding] -> SpatialDropout
//!   -> BiGRU -> RnnPooling readout (+ Dense(relu)(numeric_columns__))
//!   -> Dropout -> Dense(6, sigmoid)
//! ```
//!
//! The fixed embedding holds the pretrained vectors and never trains; the
//! free embedding is a small randomly initialised table that always trains.

use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::{declare_inputs, CompiledModel};
use crate::model_architectures::config::BiGru2Config;
use crate::model_architectures::layers::dense::{
    spatial_dropout_1d, ClassificationHead, NumericBranch,
};
use crate::model_architectures::layers::embedding::{load_pretrained, text_embedding};
use crate::model_architectures::layers::pooling::RnnPooling;
use crate::model_architectures::layers::recurrent::BiGru;
use crate::model_architectures::optimizer::OptimizerConfig;
use crate::model_architectures::rnn::{
    check_target_shape, join_numeric, projected_numeric, with_numeric_width,
};
use crate::model_architectures::traits::{ArchitectureKind, ModelInputs, TextClassifierNetwork};
use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{Embedding, Module, VarBuilder, VarMap};

#[derive(Debug)]
pub struct BiGru2 {
    fixed_embedding: Embedding,
    free_embedding: Option<Embedding>,
    emb_dropout: f32,
    rnn: BiGru,
    pooling: RnnPooling,
    numeric: Option<NumericBranch>,
    head: ClassificationHead,
}

impl TextClassifierNetwork for BiGru2 {
    fn kind(&self) -> ArchitectureKind {
        ArchitectureKind::BiGru2
    }

    fn forward(&self, inputs: &ModelInputs, train: bool) -> Result<Tensor> {
        let fixed = self.fixed_embedding.forward(&inputs.comment_text)?;
        let emb = match &self.free_embedding {
            Some(free) => Tensor::cat(&[fixed, free.forward(&inputs.comment_text)?], 2)?,
            None => fixed,
        };
        let emb = spatial_dropout_1d(&emb, self.emb_dropout, train)?;

        let encoded = self.rnn.forward(&emb)?;
        let out = join_numeric(self.pooling.reduce(&encoded)?, &self.numeric, inputs)?;
        self.head.forward(&out, train)
    }
}

/// Build and compile `bigru_2`
pub fn bigru_2(
    data: &DatasetDescriptor,
    target_shape: &[usize],
    config: &BiGru2Config,
    device: &Device,
) -> UnifiedResult<CompiledModel> {
    check_target_shape(ArchitectureKind::BiGru2, target_shape);

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

    let fix_file = config.text_emb_fix_file.as_deref();
    let pretrained = load_pretrained(data, fix_file, config.text_emb_fix_size, None, device)?;
    let fixed_embedding = text_embedding(
        &varmap,
        "fixed_embedding",
        data.text_voc_size,
        config.text_emb_fix_size,
        pretrained,
        fix_file.is_none(),
        device,
    )?;

    let free_embedding = if config.text_emb_free_size > 0 {
        Some(text_embedding(
            &varmap,
            "free_embedding",
            data.text_voc_size,
            config.text_emb_free_size,
            None,
            true,
            device,
        )?)
    } else {
        None
    };

    let emb_width = config.text_emb_fix_size + config.text_emb_free_size;
    let rnn = BiGru::new(emb_width, config.rnn_size, vb.pp("bigru"))?;
    let numeric = projected_numeric(data, config.num_layer_size, vb.pp("numeric"))?;
    let head = ClassificationHead::new(
        with_numeric_width(config.rnn_pooling.output_width(config.rnn_size), &numeric),
        Some(config.out_dropout),
        vb.pp("output"),
    )?;

    let network = BiGru2 {
        fixed_embedding,
        free_embedding,
        emb_dropout: config.text_emb_dropout,
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
