//! Subject vocabulary model.

use serde::{Deserialize, Serialize};

/// A single subject a project can assign to documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Stable identifier of the subject.
    pub uri: String,
    /// Human-readable label.
    pub label: String,
}

impl Subject {
    pub fn new(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
        }
    }
}

/// A fixed, ordered set of subjects shared by one or more projects.
///
/// The subject count defines the width of every suggestion batch produced
/// against this vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    vocab_id: String,
    languages: Vec<String>,
    subjects: Vec<Subject>,
}

impl Vocabulary {
    pub fn new(
        vocab_id: impl Into<String>,
        languages: Vec<String>,
        subjects: Vec<Subject>,
    ) -> Self {
        Self {
            vocab_id: vocab_id.into(),
            languages,
            subjects,
        }
    }

    pub fn vocab_id(&self) -> &str {
        &self.vocab_id
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn supports_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    /// The ordered subject list.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Number of subjects in the vocabulary.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
