//! A trivial backend for wiring, smoke testing and development setups.
//!
//! Suggests a fixed subject at a configurable score and needs no
//! training. Supports incremental learning by replaying the subjects of
//! the most recently learned document.

use super::{Backend, BackendContext, LearningBackend, ParamMap};
use crate::corpus::{DocumentCorpus, TrainingCorpus};
use crate::error::{Error, Result};
use crate::project::ProjectConfig;
use crate::suggestion::{SubjectSuggestion, SuggestionVector};

const DEFAULT_SCORE: f64 = 1.0;

#[derive(Debug)]
pub struct DummyBackend {
    backend_id: String,
    score: f64,
    subject_id: usize,
    learned: Option<Vec<usize>>,
}

impl DummyBackend {
    pub fn new(backend_id: impl Into<String>) -> Self {
        Self {
            backend_id: backend_id.into(),
            score: DEFAULT_SCORE,
            subject_id: 0,
            learned: None,
        }
    }

    /// Construct from project configuration. Recognized settings:
    /// `score` (default 1.0) and `subject_index` (default 0).
    pub fn from_config(
        backend_id: &str,
        config: &ProjectConfig,
        context: BackendContext,
    ) -> Result<Self> {
        let mut backend = Self::new(backend_id);
        if let Some(raw) = config.get("score") {
            backend.score = raw.parse().map_err(|_| Error::Configuration {
                message: format!("invalid score value '{}'", raw),
                project_id: context.project_id.clone(),
            })?;
        }
        if let Some(raw) = config.get("subject_index") {
            backend.subject_id = raw.parse().map_err(|_| Error::Configuration {
                message: format!("invalid subject_index value '{}'", raw),
                project_id: context.project_id.clone(),
            })?;
        }
        Ok(backend)
    }
}

impl Backend for DummyBackend {
    fn backend_id(&self) -> &str {
        &self.backend_id
    }

    fn suggest(&mut self, texts: &[String], params: &ParamMap) -> Result<Vec<SuggestionVector>> {
        let score = match params.get("score") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Backend(format!("invalid score value '{}'", raw)))?,
            None => self.score,
        };
        let subjects: Vec<usize> = match &self.learned {
            Some(learned) => learned.clone(),
            None => vec![self.subject_id],
        };
        Ok(texts
            .iter()
            .map(|_| {
                SuggestionVector::new(
                    subjects
                        .iter()
                        .map(|&subject_id| SubjectSuggestion::new(subject_id, score))
                        .collect(),
                )
            })
            .collect())
    }

    fn train(&mut self, corpus: TrainingCorpus, _params: &ParamMap, _jobs: u32) -> Result<()> {
        match corpus {
            TrainingCorpus::Cached => {
                log::debug!("Backend '{}': reusing cached training data", self.backend_id);
            }
            TrainingCorpus::Documents(mut docs) => {
                let count: usize = docs.doc_batches().map(|batch| batch.len()).sum();
                log::debug!("Backend '{}': consumed {} training documents", self.backend_id, count);
            }
        }
        Ok(())
    }

    fn is_trained(&self) -> Result<bool> {
        Ok(true)
    }

    fn as_learning(&mut self) -> Option<&mut dyn LearningBackend> {
        Some(self)
    }
}

impl LearningBackend for DummyBackend {
    fn learn(&mut self, mut corpus: Box<dyn DocumentCorpus>, _params: &ParamMap) -> Result<()> {
        for batch in corpus.doc_batches() {
            for doc in batch {
                if !doc.subjects.is_empty() {
                    self.learned = Some(doc.subjects);
                }
            }
        }
        Ok(())
    }
}
