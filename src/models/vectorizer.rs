//! Pre-fit TF-IDF vectorizer.
//!
//! Reproduces the transform side of a scikit-learn `TfidfVectorizer`:
//! lowercasing, regex tokenization, word n-grams, raw (or sublinear) term
//! counts weighted by the learned idf, then per-document normalization.
//! Fitting is out of scope; vocabulary and idf come from the artifact.

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// scikit-learn's default token pattern: words of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

// Python's `re` word characters: letters, numbers and underscore. The regex
// crate's `\w` also takes marks, joiners and connector punctuation.
const WORD_CLASS_ITEMS: &str = r"\p{L}\p{N}_";
const WORD_CLASS: &str = r"[\p{L}\p{N}_]";
const NON_WORD_CLASS: &str = r"[^\p{L}\p{N}_]";

// `\b\w\w+\b` with Python word characters is a maximal run of two or more.
const DEFAULT_TOKENIZER: &str = r"[\p{L}\p{N}_]{2,}";

/// Rewrite a Python token pattern for the regex crate.
///
/// The default pattern maps to its exact equivalent. In other patterns `\w`
/// and `\W` are rewritten to Python's word class; `\b` keeps the regex
/// crate's Unicode word boundary.
pub fn compile_token_pattern(pattern: &str) -> Result<Regex> {
    let translated = if pattern == DEFAULT_TOKEN_PATTERN || pattern == r"\b\w\w+\b" {
        DEFAULT_TOKENIZER.to_string()
    } else {
        translate_word_classes(pattern)
    };
    Regex::new(&translated).with_context(|| format!("Invalid token pattern {:?}", pattern))
}

fn translate_word_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut class_depth = 0usize;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('w') if class_depth > 0 => out.push_str(WORD_CLASS_ITEMS),
                Some('w') => out.push_str(WORD_CLASS),
                Some('W') => out.push_str(NON_WORD_CLASS),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            '[' => {
                class_depth += 1;
                out.push(c);
                // A leading `]` (or `^]`) is a literal member, not the close.
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Per-document normalization applied after idf weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// On-disk form of a fitted vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

impl Default for TfidfArtifact {
    fn default() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            norm: default_norm(),
            sublinear_tf: false,
        }
    }
}

/// Sparse vector with entries sorted by index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs; indices must be below `dim`.
    pub fn from_entries(dim: usize, entries: BTreeMap<usize, f64>) -> Self {
        Self {
            dim,
            entries: entries.into_iter().filter(|(idx, _)| *idx < dim).collect(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (nonzero) entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(idx, _)| *idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Append the dense form of this vector to `out`.
    pub fn extend_dense(&self, out: &mut Vec<f64>) {
        let start = out.len();
        out.resize(start + self.dim, 0.0);
        for &(idx, value) in &self.entries {
            out[start + idx] = value;
        }
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = Vec::with_capacity(self.dim);
        self.extend_dense(&mut dense);
        dense
    }
}

/// TF-IDF vectorizer over a fixed, pre-learned vocabulary.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "TfidfArtifact", into = "TfidfArtifact")]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    token_pattern: String,
    tokenizer: Regex,
    ngram_range: (usize, usize),
    norm: Option<Norm>,
    sublinear_tf: bool,
}

impl fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("token_pattern", &self.token_pattern)
            .field("ngram_range", &self.ngram_range)
            .field("norm", &self.norm)
            .field("sublinear_tf", &self.sublinear_tf)
            .finish()
    }
}

impl TfidfVectorizer {
    /// Build a vectorizer from a fitted artifact, validating its consistency.
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self> {
        if artifact.idf.len() != artifact.vocabulary.len() {
            bail!(
                "idf has {} entries but vocabulary has {} terms",
                artifact.idf.len(),
                artifact.vocabulary.len()
            );
        }

        let mut seen = vec![false; artifact.vocabulary.len()];
        for (term, &idx) in &artifact.vocabulary {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => bail!("Vocabulary index {} is assigned twice (term {:?})", idx, term),
                None => bail!("Vocabulary index {} out of range (term {:?})", idx, term),
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            bail!("Invalid ngram_range ({}, {})", min_n, max_n);
        }

        let tokenizer = compile_token_pattern(&artifact.token_pattern)?;
        if tokenizer.captures_len() > 2 {
            bail!("Token pattern may contain at most one capturing group");
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            token_pattern: artifact.token_pattern,
            tokenizer,
            ngram_range: artifact.ngram_range,
            norm: artifact.norm,
            sublinear_tf: artifact.sublinear_tf,
        })
    }

    /// Whether the vectorizer carries a learned vocabulary
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vocabulary index of `term`, if known
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Transform a document into its TF-IDF vector.
    ///
    /// Terms outside the vocabulary are ignored. A document without any known
    /// term yields an all-zero vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        for (&idx, weight) in counts.iter_mut() {
            if self.sublinear_tf {
                *weight = weight.ln() + 1.0;
            }
            *weight *= self.idf[idx];
        }

        let norm = match self.norm {
            Some(Norm::L2) => counts.values().map(|w| w * w).sum::<f64>().sqrt(),
            Some(Norm::L1) => counts.values().map(|w| w.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            for weight in counts.values_mut() {
                *weight /= norm;
            }
        }

        SparseVector::from_entries(self.vocabulary.len(), counts)
    }

    /// Split a document into the terms looked up in the vocabulary.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let text = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };
        let tokens = self.tokenize(&text);
        self.word_ngrams(tokens)
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        if self.tokenizer.captures_len() == 2 {
            self.tokenizer
                .captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
                .collect()
        } else {
            self.tokenizer
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect()
        }
    }

    fn word_ngrams(&self, tokens: Vec<String>) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }

        let mut terms = if min_n == 1 { tokens.clone() } else { Vec::new() };
        let first_n = min_n.max(2);
        for n in first_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

impl Default for TfidfVectorizer {
    /// Untrained vectorizer: empty vocabulary, every document maps to a
    /// zero-width vector.
    fn default() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            lowercase: true,
            token_pattern: default_token_pattern(),
            tokenizer: Regex::new(DEFAULT_TOKENIZER).expect("valid default tokenizer"),
            ngram_range: default_ngram_range(),
            norm: default_norm(),
            sublinear_tf: false,
        }
    }
}

impl TryFrom<TfidfArtifact> for TfidfVectorizer {
    type Error = anyhow::Error;

    fn try_from(artifact: TfidfArtifact) -> Result<Self> {
        Self::from_artifact(artifact)
    }
}

impl From<TfidfVectorizer> for TfidfArtifact {
    fn from(vectorizer: TfidfVectorizer) -> Self {
        Self {
            vocabulary: vectorizer.vocabulary,
            idf: vectorizer.idf,
            lowercase: vectorizer.lowercase,
            token_pattern: vectorizer.token_pattern,
            ngram_range: vectorizer.ngram_range,
            norm: vectorizer.norm,
            sublinear_tf: vectorizer.sublinear_tf,
        }
    }
}
