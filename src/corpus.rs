//! Document corpus interfaces for training and evaluation.

use crate::defaults;

/// A single document with its gold-standard subject assignments.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub text: String,
    /// Indices into the project vocabulary.
    pub subjects: Vec<usize>,
}

impl Document {
    pub fn new(text: impl Into<String>, subjects: Vec<usize>) -> Self {
        Self {
            text: text.into(),
            subjects,
        }
    }
}

/// A lazy, forward-only source of document batches.
///
/// Corpora are single-pass: `doc_batches` may only be consumed once, and
/// implementations are free to read from non-restartable sources.
pub trait DocumentCorpus {
    fn doc_batches(&mut self) -> Box<dyn Iterator<Item = Vec<Document>> + '_>;
}

/// An in-memory corpus over a list of documents.
pub struct DocumentList {
    docs: Vec<Document>,
}

impl DocumentList {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }
}

impl DocumentCorpus for DocumentList {
    fn doc_batches(&mut self) -> Box<dyn Iterator<Item = Vec<Document>> + '_> {
        Box::new(
            self.docs
                .chunks(defaults::DOC_BATCH_SIZE)
                .map(|chunk| chunk.to_vec()),
        )
    }
}

/// Training input: a live document source, or the training cache the
/// backend prepared in an earlier run.
pub enum TrainingCorpus {
    /// Reuse the backend's cached training data; no corpus transform is
    /// applied.
    Cached,
    /// Train from a live document source.
    Documents(Box<dyn DocumentCorpus>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<Document> {
        (0..n).map(|i| Document::new(format!("doc {}", i), vec![i])).collect()
    }

    #[test]
    fn test_document_list_batching() {
        let mut corpus = DocumentList::new(docs(40));
        let batches: Vec<Vec<Document>> = corpus.doc_batches().collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 32);
        assert_eq!(batches[1].len(), 8);
    }

    #[test]
    fn test_document_list_preserves_order() {
        let mut corpus = DocumentList::new(docs(3));
        let batches: Vec<Vec<Document>> = corpus.doc_batches().collect();
        assert_eq!(batches[0][0].text, "doc 0");
        assert_eq!(batches[0][2].text, "doc 2");
    }

    #[test]
    fn test_empty_corpus_yields_no_batches() {
        let mut corpus = DocumentList::new(Vec::new());
        assert_eq!(corpus.doc_batches().count(), 0);
    }
}
