//! Static text statistics for spam model inference.
//!
//! This module computes the hand-crafted features that sit next to the
//! TF-IDF block in the model input. The character classes, the anchoring of
//! the capital-run pattern and the truncation length must stay identical to
//! the preprocessing used when the model was trained.

use regex::Regex;
use std::sync::LazyLock;

/// Only the last `MAX_TEXT_CHARS` characters of a submission are classified.
pub const MAX_TEXT_CHARS: usize = 400;

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.,/]").expect("valid punctuation pattern"));

// Anchored at the start of the text, so at most one match per call.
static LEADING_CAPITALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z]+").expect("valid capital-run pattern"));

/// Keep the last `MAX_TEXT_CHARS` characters of `text`.
///
/// Shorter text is returned unchanged. Counting is done in Unicode scalar
/// values, never bytes, so the cut always lands on a character boundary.
pub fn truncate(text: &str) -> &str {
    match text.char_indices().rev().nth(MAX_TEXT_CHARS - 1) {
        Some((offset, _)) => &text[offset..],
        None => text,
    }
}

/// Count characters outside `[A-Za-z0-9.,/]`, ignoring plain spaces.
pub fn count_punctuation(text: &str) -> usize {
    PUNCTUATION.find_iter(&strip_spaces(text)).count()
}

/// Count leading runs of two or more uppercase ASCII letters, ignoring plain spaces.
pub fn count_capitals(text: &str) -> usize {
    LEADING_CAPITALS.find_iter(&strip_spaces(text)).count()
}

/// Character length of `text`.
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

fn strip_spaces(text: &str) -> String {
    text.replace(' ', "")
}

/// Raw (unnormalized) static statistics of one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStatistics {
    pub punctuation: usize,
    pub capitals: usize,
    pub length: usize,
}

/// Feature extractor that turns text into its static statistics.
///
/// Statistics are produced in the exact order expected by the classifier
/// after the TF-IDF block: punctuation, capitals, length.
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract statistics from text that has already been truncated.
    pub fn extract(&self, text: &str) -> TextStatistics {
        TextStatistics {
            punctuation: count_punctuation(text),
            capitals: count_capitals(text),
            length: text_length(text),
        }
    }

    /// Get the number of static features produced.
    pub fn feature_count(&self) -> usize {
        3
    }

    /// Get feature names (matching the training column order).
    pub fn feature_names(&self) -> Vec<&'static str> {
        vec!["punct_count", "cap_count", "text_len"]
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
