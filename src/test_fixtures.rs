//! Shared Test Fixtures for candle-toxic-rnn
//!
//! Reusable rstest fixtures: devices, small fitted datasets, sample
//! comments and temporary embedding files.

#[cfg(test)]
pub mod fixtures {
    use crate::data::dataset::DatasetDescriptor;
    use crate::training::features::{Comment, LabelRow};
    use candle_core::Device;
    use rstest::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Numeric columns used by the two-input fixtures
    pub const NUMERIC_COLUMNS: [&str; 3] = ["caps_ratio", "exclamations", "length"];

    /// Sequence length of the small fixtures
    pub const SMALL_MAX_TEXT_LEN: usize = 12;

    /// Get test device (GPU if available, otherwise CPU)
    pub fn test_device() -> Device {
        if let Ok(device) = Device::cuda_if_available(0) {
            if !matches!(device, Device::Cpu) {
                println!("Using CUDA GPU for testing");
                return device;
            }
        }

        #[cfg(feature = "metal")]
        {
            if let Ok(device) = Device::new_metal(0) {
                println!("Using Metal GPU for testing");
                return device;
            }
        }

        Device::Cpu
    }

    /// Device fixture - dynamically selects GPU or CPU
    #[fixture]
    pub fn device() -> Device {
        test_device()
    }

    #[fixture]
    pub fn cpu_device() -> Device {
        Device::Cpu
    }

    /// Temporary directory fixture for file operations
    #[fixture]
    pub fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temporary directory")
    }

    /// Sample comment texts
    #[fixture]
    pub fn sample_texts() -> Vec<&'static str> {
        vec![
            "You are a wonderful person, thank you for the edit",
            "This article is garbage and so are you",
            "Please stop vandalising the page or you will be blocked",
            "I will find you and you will regret this",
            "Great work on the references section!",
            "What an idiot, nobody cares about your opinion",
            "Thanks for the quick reply",
            "STOP REVERTING MY CHANGES you fool",
        ]
    }

    /// Labels matching `sample_texts`, in `LABEL_NAMES` order
    #[fixture]
    pub fn sample_labels() -> Vec<LabelRow> {
        vec![
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        ]
    }

    /// Comments without numeric features
    #[fixture]
    pub fn sample_comments(sample_texts: Vec<&'static str>) -> Vec<Comment> {
        sample_texts.into_iter().map(Comment::new).collect()
    }

    /// Comments carrying one value per `NUMERIC_COLUMNS` entry
    #[fixture]
    pub fn numeric_comments(sample_texts: Vec<&'static str>) -> Vec<Comment> {
        sample_texts
            .into_iter()
            .map(|text| {
                let caps = text.chars().filter(|c| c.is_uppercase()).count() as f32;
                let bangs = text.matches('!').count() as f32;
                let len = text.len() as f32;
                Comment::with_numeric(text, vec![caps / len, bangs, len / 100.0])
            })
            .collect()
    }

    /// Text-only descriptor fitted on `sample_texts`
    #[fixture]
    pub fn small_dataset(sample_texts: Vec<&'static str>) -> DatasetDescriptor {
        DatasetDescriptor::fit(&sample_texts, Vec::new(), SMALL_MAX_TEXT_LEN, 64)
    }

    /// Descriptor fitted on `sample_texts` with `NUMERIC_COLUMNS`
    #[fixture]
    pub fn numeric_dataset(sample_texts: Vec<&'static str>) -> DatasetDescriptor {
        DatasetDescriptor::fit(
            &sample_texts,
            NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect(),
            SMALL_MAX_TEXT_LEN,
            64,
        )
    }

    /// `k` synthetic numeric column names
    pub fn numeric_columns(k: usize) -> Vec<String> {
        (0..k).map(|i| format!("num_{}", i)).collect()
    }

    /// Descriptor with an empty tokenizer and the given shape
    pub fn shaped_dataset(
        max_text_len: usize,
        text_voc_size: usize,
        k: usize,
    ) -> DatasetDescriptor {
        DatasetDescriptor::new(
            max_text_len,
            text_voc_size,
            Default::default(),
            numeric_columns(k),
        )
    }

    /// Write `lines` to `name` inside `dir` and return its path
    pub fn write_embedding_file(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("Failed to create embedding file");
        for line in lines {
            writeln!(file, "{}", line).expect("Failed to write embedding file");
        }
        path
    }
}

#[cfg(test)]
pub mod test_utils {
    use crate::core::unified_error::UnifiedError;

    /// Assert that an error is of expected type
    pub fn assert_error_type(error: &UnifiedError, expected_type: &str) {
        let error_string = format!("{:?}", error);
        assert!(
            error_string.contains(expected_type),
            "Expected error type '{}', got: {}",
            expected_type,
            error_string
        );
    }

    /// Create a temporary config file with given content
    pub fn create_temp_config_file(
        content: &str,
    ) -> Result<tempfile::NamedTempFile, std::io::Error> {
        use std::io::Write;
        let mut temp_file = tempfile::NamedTempFile::new()?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;
        Ok(temp_file)
    }
}
