//! Stacked bidirectional LSTM classifier
//!
//! ```text
//! comment_text -> Embedding -> Dropout
//!   -> [BiLSTM -> SpatialDropout?] x len(rnn_layers)
//!   -> GlobalMaxPool (+ numeric_columns__)
//!   -> [Dense(relu) -> Dropout] x len(mlp_layers)
//!   -> Dense(6, sigmoid)
//! ```

use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::{declare_inputs, CompiledModel};
use crate::model_architectures::config::CudnnLstm1Config;
use crate::model_architectures::layers::dense::{
    spatial_dropout_1d, ClassificationHead, DenseActivation, DropoutPlacement, MlpStack,
    NumericBranch,
};
use crate::model_architectures::layers::embedding::{load_pretrained, text_embedding};
use crate::model_architectures::layers::pooling::global_max_pool;
use crate::model_architectures::layers::recurrent::BiLstm;
use crate::model_architectures::optimizer::OptimizerConfig;
use crate::model_architectures::rnn::{
    check_target_shape, join_numeric, passthrough_numeric, with_numeric_width,
};
use crate::model_architectures::traits::{ArchitectureKind, ModelInputs, TextClassifierNetwork};
use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{Dropout, Embedding, Module, VarBuilder, VarMap};

#[derive(Debug)]
pub struct CudnnLstm1 {
    embedding: Embedding,
    emb_dropout: Dropout,
    lstms: Vec<BiLstm>,
    rnn_dropout: Option<f32>,
    numeric: Option<NumericBranch>,
    mlp: MlpStack,
    head: ClassificationHead,
}

impl TextClassifierNetwork for CudnnLstm1 {
    fn kind(&self) -> ArchitectureKind {
        ArchitectureKind::CudnnLstm1
    }

    fn forward(&self, inputs: &ModelInputs, train: bool) -> Result<Tensor> {
        let emb = self.embedding.forward(&inputs.comment_text)?;
        let mut seq = self.emb_dropout.forward(&emb, train)?;

        for lstm in &self.lstms {
            seq = lstm.forward(&seq)?;
            if let Some(rate) = self.rnn_dropout {
                seq = spatial_dropout_1d(&seq, rate, train)?;
            }
        }

        let out = join_numeric(global_max_pool(&seq)?, &self.numeric, inputs)?;
        let out = self.mlp.forward(&out, train)?;
        self.head.forward(&out, train)
    }
}

/// Build and compile `cudnn_lstm_1`
pub fn cudnn_lstm_1(
    data: &DatasetDescriptor,
    target_shape: &[usize],
    config: &CudnnLstm1Config,
    device: &Device,
) -> UnifiedResult<CompiledModel> {
    check_target_shape(ArchitectureKind::CudnnLstm1, target_shape);

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

    let file = config.text_emb_file.as_deref();
    let pretrained = load_pretrained(data, file, config.text_emb_size, None, device)?;
    let embedding = text_embedding(
        &varmap,
        "embedding",
        data.text_voc_size,
        config.text_emb_size,
        pretrained,
        file.is_none(),
        device,
    )?;

    let mut lstms = Vec::with_capacity(config.rnn_layers.len());
    let mut width = config.text_emb_size;
    for (idx, &layer_size) in config.rnn_layers.iter().enumerate() {
        let lstm = BiLstm::new(width, layer_size, vb.pp(format!("lstm_{}", idx)))?;
        width = lstm.output_size();
        lstms.push(lstm);
    }

    let numeric = passthrough_numeric(data);
    let mlp = MlpStack::new(
        with_numeric_width(width, &numeric),
        &config.mlp_layers,
        DenseActivation::Relu,
        Some(config.mlp_dropout),
        DropoutPlacement::After,
        vb.pp("mlp"),
    )?;
    let head = ClassificationHead::new(mlp.out_features(), None, vb.pp("output"))?;

    let network = CudnnLstm1 {
        embedding,
        emb_dropout: Dropout::new(config.text_emb_dropout),
        lstms,
        rnn_dropout: config.rnn_dropout,
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
