//! Bidirectional GRU followed by a width-2 convolution
//!
//! ```text
//! comment_text -> Embedding -> SpatialDropout -> BiGRU -> SpatialDropout?
//!   -> Conv1D(conv_size, kernel 2, valid, he_uniform)
//!   -> [GlobalMax | GlobalAvg] (+ numeric_columns__)
//!   -> Dropout? -> Dense(6, sigmoid)
//! ```

use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::{declare_inputs, CompiledModel};
use crate::model_architectures::config::BiGruCnn1Config;
use crate::model_architectures::layers::dense::{
    spatial_dropout_1d, ClassificationHead, NumericBranch,
};
use crate::model_architectures::layers::embedding::{load_pretrained, text_embedding};
use crate::model_architectures::layers::pooling::max_avg_pool;
use crate::model_architectures::layers::recurrent::BiGru;
use crate::model_architectures::optimizer::OptimizerConfig;
use crate::model_architectures::rnn::{
    check_target_shape, join_numeric, passthrough_numeric, with_numeric_width,
};
use crate::model_architectures::traits::{ArchitectureKind, ModelInputs, TextClassifierNetwork};
use crate::validation_error;
use candle_core::{DType, Device, Result, Tensor};
use candle_nn::init::{FanInOut, Init, NonLinearity, NormalOrUniform};
use candle_nn::{Conv1d, Conv1dConfig, Embedding, Module, VarBuilder, VarMap};

const KERNEL_SIZE: usize = 2;

#[derive(Debug)]
pub struct BiGruCnn1 {
    embedding: Embedding,
    emb_dropout: f32,
    rnn: BiGru,
    rnn_dropout: Option<f32>,
    conv: Conv1d,
    numeric: Option<NumericBranch>,
    head: ClassificationHead,
}

impl TextClassifierNetwork for BiGruCnn1 {
    fn kind(&self) -> ArchitectureKind {
        ArchitectureKind::BiGruCnn1
    }

    fn forward(&self, inputs: &ModelInputs, train: bool) -> Result<Tensor> {
        let emb = self.embedding.forward(&inputs.comment_text)?;
        let emb = spatial_dropout_1d(&emb, self.emb_dropout, train)?;

        let mut seq = self.rnn.forward(&emb)?.sequence;
        if let Some(rate) = self.rnn_dropout {
            seq = spatial_dropout_1d(&seq, rate, train)?;
        }

        // Conv1d works on [batch, channels, time]
        let conv = self
            .conv
            .forward(&seq.transpose(1, 2)?.contiguous()?)?
            .transpose(1, 2)?;

        let out = join_numeric(max_avg_pool(&conv)?, &self.numeric, inputs)?;
        self.head.forward(&out, train)
    }
}

/// Convolution with He-uniform kernel and zero bias
fn he_uniform_conv1d(
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    vb: VarBuilder,
) -> Result<Conv1d> {
    let weight = vb.get_with_hints(
        (out_channels, in_channels, kernel_size),
        "weight",
        Init::Kaiming {
            dist: NormalOrUniform::Uniform,
            fan: FanInOut::FanIn,
            non_linearity: NonLinearity::ReLU,
        },
    )?;
    let bias = vb.get_with_hints(out_channels, "bias", Init::Const(0.0))?;
    Ok(Conv1d::new(weight, Some(bias), Conv1dConfig::default()))
}

/// Build and compile `bigru_cnn_1`
pub fn bigru_cnn_1(
    data: &DatasetDescriptor,
    target_shape: &[usize],
    config: &BiGruCnn1Config,
    device: &Device,
) -> UnifiedResult<CompiledModel> {
    check_target_shape(ArchitectureKind::BiGruCnn1, target_shape);
    if data.max_text_len < KERNEL_SIZE {
        return Err(validation_error!(
            "max_text_len",
            format!(">= {}", KERNEL_SIZE),
            data.max_text_len,
            "bigru_cnn_1 convolution needs at least one full window"
        ));
    }

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
    let conv = he_uniform_conv1d(
        rnn.output_size(),
        config.conv_size,
        KERNEL_SIZE,
        vb.pp("conv"),
    )?;
    let numeric = passthrough_numeric(data);
    let head = ClassificationHead::new(
        with_numeric_width(2 * config.conv_size, &numeric),
        config.out_dropout,
        vb.pp("output"),
    )?;

    let network = BiGruCnn1 {
        embedding,
        emb_dropout: emb_cfg.text_emb_dropout,
        rnn,
        rnn_dropout: config.rnn_dropout,
        conv,
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
