//! Model Factory
//!
//! Dispatches an `ArchitectureConfig` to the matching builder so callers
//! can pick a variant from configuration rather than code.

use crate::core::UnifiedResult;
use crate::data::dataset::DatasetDescriptor;
use crate::model_architectures::compiled::CompiledModel;
use crate::model_architectures::config::ArchitectureConfig;
use crate::model_architectures::rnn::{
    bigru_1, bigru_2, bigru_cnn_1, bigru_rcnn_1, bigru_rcnn_2, cudnn_lstm_1,
};
use candle_core::Device;
use tracing::debug;

/// Builder front-end for every architecture variant
pub struct ModelFactory;

impl ModelFactory {
    /// Build and compile the variant selected by `config`
    pub fn build(
        config: &ArchitectureConfig,
        data: &DatasetDescriptor,
        target_shape: &[usize],
        device: &Device,
    ) -> UnifiedResult<CompiledModel> {
        debug!(
            architecture = config.kind().name(),
            max_text_len = data.max_text_len,
            text_voc_size = data.text_voc_size,
            numeric_columns = data.num_numeric_columns(),
            "building model"
        );
        match config {
            ArchitectureConfig::CudnnLstm1(c) => cudnn_lstm_1(data, target_shape, c, device),
            ArchitectureConfig::BiGru1(c) => bigru_1(data, target_shape, c, device),
            ArchitectureConfig::BiGru2(c) => bigru_2(data, target_shape, c, device),
            ArchitectureConfig::BiGruCnn1(c) => bigru_cnn_1(data, target_shape, c, device),
            ArchitectureConfig::BiGruRcnn1(c) => bigru_rcnn_1(data, target_shape, c, device),
            ArchitectureConfig::BiGruRcnn2(c) => bigru_rcnn_2(data, target_shape, c, device),
        }
    }

    /// Build the named variant with its default configuration
    pub fn build_default(
        name: &str,
        data: &DatasetDescriptor,
        target_shape: &[usize],
        device: &Device,
    ) -> UnifiedResult<CompiledModel> {
        let config = ArchitectureConfig::from_name(name)?;
        Self::build(&config, data, target_shape, device)
    }
}
