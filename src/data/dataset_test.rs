//! Tests for dataset module

use super::dataset::*;
use crate::test_fixtures::fixtures::*;
use rstest::*;
use std::collections::HashMap;

#[rstest]
#[case("Hello, World!", vec!["hello", "world"])]
#[case("  tabs\tand\nnewlines  ", vec!["tabs", "and", "newlines"])]
#[case("don't (stop) me-now", vec!["don't", "stop", "me", "now"])]
#[case("", vec![])]
fn test_dataset_split(#[case] text: &str, #[case] expected: Vec<&str>) {
    assert_eq!(TextTokenizer::split(text), expected);
}

/// Indices follow descending frequency, ties by first appearance
#[rstest]
fn test_dataset_fit_on_texts_ranking() {
    let mut tokenizer = TextTokenizer::new(None);
    tokenizer.fit_on_texts(&["b a c", "a c", "a d"]);

    assert_eq!(tokenizer.word_index["a"], 1);
    assert_eq!(tokenizer.word_index["c"], 2);
    assert_eq!(tokenizer.word_index["b"], 3);
    assert_eq!(tokenizer.word_index["d"], 4);
    assert_eq!(tokenizer.word_index.len(), 4);
}

#[rstest]
fn test_dataset_texts_to_sequences_respects_num_words() {
    let mut tokenizer = TextTokenizer::new(Some(3));
    tokenizer.fit_on_texts(&["b a c", "a c", "a d"]);

    let sequences = tokenizer.texts_to_sequences(&["a b c d unknown"]);
    assert_eq!(sequences, vec![vec![1, 2]]);
}

#[rstest]
#[case(vec![1, 2, 3], 5, vec![0, 0, 1, 2, 3])]
#[case(vec![1, 2, 3, 4, 5, 6], 4, vec![3, 4, 5, 6])]
#[case(vec![7, 8], 2, vec![7, 8])]
#[case(vec![], 3, vec![0, 0, 0])]
fn test_dataset_pad_sequence(
    #[case] sequence: Vec<u32>,
    #[case] max_len: usize,
    #[case] expected: Vec<u32>,
) {
    assert_eq!(pad_sequence(&sequence, max_len), expected);
}

#[rstest]
fn test_dataset_pad_sequences_batch() {
    let padded = pad_sequences(&[vec![1], vec![1, 2, 3]], 2);
    assert_eq!(padded, vec![vec![0, 1], vec![2, 3]]);
}

/// Vocabulary size is capped by max_features and includes padding
#[rstest]
fn test_dataset_descriptor_fit(sample_texts: Vec<&'static str>) {
    let full = DatasetDescriptor::fit(&sample_texts, Vec::new(), 10, 10_000);
    assert_eq!(
        full.text_voc_size,
        full.text_tokenizer.word_index.len() + 1
    );
    assert!(!full.has_numeric_columns());

    let capped = DatasetDescriptor::fit(&sample_texts, vec!["x".to_string()], 10, 5);
    assert_eq!(capped.text_voc_size, 5);
    assert_eq!(capped.num_numeric_columns(), 1);
}

/// Encoded text is padded and never indexes past the vocabulary
#[rstest]
fn test_dataset_encode_text(small_dataset: DatasetDescriptor) {
    let encoded = small_dataset.encode_text("you are a wonderful person");
    assert_eq!(encoded.len(), SMALL_MAX_TEXT_LEN);
    assert!(encoded
        .iter()
        .all(|&idx| (idx as usize) < small_dataset.text_voc_size));
    assert_eq!(encoded[0], 0, "short texts are pre-padded");
    assert_ne!(*encoded.last().unwrap(), 0);
}

#[rstest]
fn test_dataset_encode_text_drops_out_of_range_indices() {
    let word_index: HashMap<String, u32> = [("low", 1u32), ("high", 9u32)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let data = DatasetDescriptor::new(
        3,
        5,
        TextTokenizer::from_word_index(word_index, None),
        Vec::new(),
    );
    assert_eq!(data.encode_text("high low high"), vec![0, 0, 1]);
}
