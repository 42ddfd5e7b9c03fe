//! Minimal analyzers with no external language resources.

use super::Analyzer;

/// Default minimum word token length.
pub(crate) const MIN_TOKEN_LENGTH: usize = 3;

/// Lowercasing analyzer splitting on non-alphanumeric characters.
#[derive(Debug)]
pub struct SimpleAnalyzer {
    min_token_length: usize,
}

impl SimpleAnalyzer {
    pub fn new(min_token_length: usize) -> Self {
        Self { min_token_length }
    }
}

impl Analyzer for SimpleAnalyzer {
    fn name(&self) -> &str {
        "simple"
    }

    fn tokenize_words(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| token.chars().count() >= self.min_token_length)
            .map(|token| token.to_lowercase())
            .collect()
    }
}

/// Analyzer splitting on whitespace only, keeping tokens as written.
#[derive(Debug)]
pub struct WhitespaceAnalyzer;

impl Analyzer for WhitespaceAnalyzer {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn tokenize_words(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}
