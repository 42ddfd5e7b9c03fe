//! Suggestion results produced by backends.
//!
//! Backends return sparse subject/score vectors; the project wraps them
//! into a `SuggestionBatch` whose width is the vocabulary subject count,
//! used for bounds-checking and dense materialization by consumers.

use serde::{Deserialize, Serialize};

/// A single subject/score pair suggested for one input text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectSuggestion {
    /// Index of the subject in the project vocabulary.
    pub subject_id: usize,
    pub score: f64,
}

impl SubjectSuggestion {
    pub fn new(subject_id: usize, score: f64) -> Self {
        Self { subject_id, score }
    }
}

/// Sparse subject scores for a single input text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionVector {
    entries: Vec<SubjectSuggestion>,
}

impl SuggestionVector {
    pub fn new(entries: Vec<SubjectSuggestion>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SubjectSuggestion] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materialize the vector as a dense score array of the given width.
    /// Duplicate entries for one subject keep the highest score.
    pub fn dense(&self, width: usize) -> Vec<f64> {
        let mut scores: Vec<f64> = vec![0.0; width];
        for entry in &self.entries {
            if entry.subject_id < width {
                scores[entry.subject_id] = scores[entry.subject_id].max(entry.score);
            }
        }
        scores
    }

    /// The top `limit` entries with score above `threshold`, ordered by
    /// descending score.
    pub fn filter(&self, limit: Option<usize>, threshold: f64) -> SuggestionVector {
        let mut entries: Vec<SubjectSuggestion> = self
            .entries
            .iter()
            .copied()
            .filter(|e| e.score > threshold)
            .collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        SuggestionVector::new(entries)
    }

    /// Drop entries outside the vocabulary and entries whose score is
    /// non-finite or non-positive.
    fn bounded(mut self, width: usize) -> SuggestionVector {
        self.entries
            .retain(|e| e.subject_id < width && e.score.is_finite() && e.score > 0.0);
        self
    }
}

/// Fixed-width batch of suggestion vectors, one per input text, in input
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionBatch {
    vectors: Vec<SuggestionVector>,
    width: usize,
}

impl SuggestionBatch {
    /// Wrap raw backend output, bounds-checking every vector against the
    /// vocabulary width.
    pub fn from_backend(vectors: Vec<SuggestionVector>, width: usize) -> Self {
        let vectors = vectors.into_iter().map(|v| v.bounded(width)).collect();
        Self { vectors, width }
    }

    /// Declared width of every vector in the batch (vocabulary size).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of input texts the batch covers.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SuggestionVector> {
        self.vectors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuggestionVector> {
        self.vectors.iter()
    }

    pub fn into_vectors(self) -> Vec<SuggestionVector> {
        self.vectors
    }

    /// Dense score matrix, one row per input text.
    pub fn dense(&self) -> Vec<Vec<f64>> {
        self.vectors.iter().map(|v| v.dense(self.width)).collect()
    }
}
