//! Dataset Descriptor and Word-Index Tokenizer
//!
//! The descriptor is what architecture builders read: sequence length,
//! vocabulary size, the token -> index mapping and the ordered list of
//! auxiliary numeric columns.
//!
//! The tokenizer follows the Keras word-index conventions: lowercase,
//! strip punctuation, split on whitespace, rank words by frequency and
//! number them from 1 (0 is reserved for padding).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Characters removed before splitting
const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Frequency-ranked word index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextTokenizer {
    /// token -> index, indices start at 1
    pub word_index: HashMap<String, u32>,
    /// Only indices `< num_words` are emitted by `texts_to_sequences`
    pub num_words: Option<usize>,
}

impl TextTokenizer {
    pub fn new(num_words: Option<usize>) -> Self {
        Self {
            word_index: HashMap::new(),
            num_words,
        }
    }

    /// Build from an explicit mapping
    pub fn from_word_index(word_index: HashMap<String, u32>, num_words: Option<usize>) -> Self {
        Self {
            word_index,
            num_words,
        }
    }

    /// Split text into normalised tokens
    pub fn split(text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if DEFAULT_FILTERS.contains(c) { ' ' } else { c })
            .collect();
        cleaned.split_whitespace().map(str::to_string).collect()
    }

    /// Rebuild the word index from a corpus
    ///
    /// Ties in frequency keep first-seen order.
    pub fn fit_on_texts<S: AsRef<str>>(&mut self, texts: &[S]) {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut seen = 0usize;
        for text in texts {
            for token in Self::split(text.as_ref()) {
                let entry = counts.entry(token).or_insert_with(|| {
                    seen += 1;
                    (0, seen)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        self.word_index = ranked
            .into_iter()
            .enumerate()
            .map(|(rank, (token, _, _))| (token, rank as u32 + 1))
            .collect();
    }

    /// Map a text to word indices, dropping unknown and out-of-range words
    pub fn text_to_sequence(&self, text: &str) -> Vec<u32> {
        Self::split(text)
            .iter()
            .filter_map(|token| self.word_index.get(token).copied())
            .filter(|&idx| self.num_words.map_or(true, |n| (idx as usize) < n))
            .collect()
    }

    pub fn texts_to_sequences<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<u32>> {
        texts
            .iter()
            .map(|t| self.text_to_sequence(t.as_ref()))
            .collect()
    }
}

/// Pad or truncate to exactly `max_len`
///
/// Pre-padding with 0 and pre-truncation: the last `max_len` tokens are kept.
pub fn pad_sequence(sequence: &[u32], max_len: usize) -> Vec<u32> {
    if sequence.len() >= max_len {
        return sequence[sequence.len() - max_len..].to_vec();
    }
    let mut padded = vec![0u32; max_len - sequence.len()];
    padded.extend_from_slice(sequence);
    padded
}

/// `pad_sequence` over a batch
pub fn pad_sequences(sequences: &[Vec<u32>], max_len: usize) -> Vec<Vec<u32>> {
    sequences
        .iter()
        .map(|seq| pad_sequence(seq, max_len))
        .collect()
}

/// Read-only description of the training data that shapes every model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Fixed token sequence length of the `comment_text` input
    pub max_text_len: usize,
    /// Vocabulary cardinality, including the padding index 0
    pub text_voc_size: usize,
    pub text_tokenizer: TextTokenizer,
    /// Ordered auxiliary numeric feature names, possibly empty
    pub numeric_columns: Vec<String>,
}

impl DatasetDescriptor {
    pub fn new(
        max_text_len: usize,
        text_voc_size: usize,
        text_tokenizer: TextTokenizer,
        numeric_columns: Vec<String>,
    ) -> Self {
        Self {
            max_text_len,
            text_voc_size,
            text_tokenizer,
            numeric_columns,
        }
    }

    /// Fit a tokenizer on `texts` and derive the vocabulary size
    ///
    /// `text_voc_size = min(max_features, word_index.len() + 1)`.
    pub fn fit<S: AsRef<str>>(
        texts: &[S],
        numeric_columns: Vec<String>,
        max_text_len: usize,
        max_features: usize,
    ) -> Self {
        let mut tokenizer = TextTokenizer::new(Some(max_features));
        tokenizer.fit_on_texts(texts);
        let text_voc_size = max_features.min(tokenizer.word_index.len() + 1);
        Self::new(max_text_len, text_voc_size, tokenizer, numeric_columns)
    }

    pub fn num_numeric_columns(&self) -> usize {
        self.numeric_columns.len()
    }

    pub fn has_numeric_columns(&self) -> bool {
        !self.numeric_columns.is_empty()
    }

    /// Token indices for `text`, padded to `max_text_len`
    ///
    /// Indices outside the embedding table (`>= text_voc_size`) are dropped.
    pub fn encode_text(&self, text: &str) -> Vec<u32> {
        let sequence: Vec<u32> = self
            .text_tokenizer
            .text_to_sequence(text)
            .into_iter()
            .filter(|&idx| (idx as usize) < self.text_voc_size)
            .collect();
        pad_sequence(&sequence, self.max_text_len)
    }
}
