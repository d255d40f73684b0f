//! One side of a candidate example: a line of text and its tokens.

use crate::config::Config;
use crate::levenshtein;
use crate::token::{tokenize, Token};

/// A tokenized line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    text: String,
    tokens: Vec<Token>,
}

impl Sample {
    /// Tokenizes `text` into a new sample.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        Self { text, tokens }
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The tokens of the text.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the text has no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token distance to `other`, normalized by the shorter of the two.
    ///
    /// Two empty samples are at distance 0; an empty and a non-empty one are infinitely apart.
    pub fn distance(&self, other: &Sample) -> f64 {
        let d = levenshtein::distance(&self.tokens, &other.tokens);
        let size = self.len().min(other.len());
        if size == 0 {
            return if d == 0 { 0.0 } else { f64::INFINITY };
        }
        d as f64 / size as f64
    }

    /// Whether `other` is close enough to be the other side of an edit of this sample.
    pub fn is_similar(&self, other: &Sample, config: &Config) -> bool {
        self.distance(other) < config.max_sample_distance
    }
}
