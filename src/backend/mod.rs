//! Pluggable classification backends.
//!
//! A backend implements `suggest` and `train`; incremental learning and
//! hyperparameter optimization are optional capabilities exposed through
//! typed queries (`as_learning`, `as_hyperopt`) instead of runtime type
//! inspection.

mod dummy;
pub mod hyperopt;

pub use dummy::DummyBackend;
pub use hyperopt::{HpOptimizer, HpRecommendation, HyperoptBackend};

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::corpus::{DocumentCorpus, TrainingCorpus};
use crate::error::Result;
use crate::suggestion::SuggestionVector;

/// Backend-specific runtime parameters.
pub type ParamMap = HashMap<String, String>;

/// Per-project context handed to a backend at construction time.
#[derive(Debug, Clone)]
pub struct BackendContext {
    pub project_id: String,
    pub language: String,
    /// Per-project storage area for model artifacts.
    pub datadir: PathBuf,
}

/// A pluggable classification backend bound to one project.
pub trait Backend: std::fmt::Debug {
    fn backend_id(&self) -> &str;

    /// Suggest subjects for a batch of already-transformed texts. Returns
    /// one sparse result vector per input text, in input order.
    fn suggest(&mut self, texts: &[String], params: &ParamMap) -> Result<Vec<SuggestionVector>>;

    /// Train from a document corpus, or from the backend's own training
    /// cache. `jobs` is a concurrency hint; 0 means backend default.
    fn train(&mut self, corpus: TrainingCorpus, params: &ParamMap, jobs: u32) -> Result<()>;

    /// Prepare the backend for use. `parallel` signals that the project
    /// will be shared across multiple worker processes.
    fn initialize(&mut self, _parallel: bool) -> Result<()> {
        Ok(())
    }

    /// Whether the backend has a trained model available.
    fn is_trained(&self) -> Result<bool>;

    /// Modification time of the trained model, if any.
    fn modification_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }

    /// Typed capability query for incremental learning.
    fn as_learning(&mut self) -> Option<&mut dyn LearningBackend> {
        None
    }

    /// Typed capability query for hyperparameter optimization.
    fn as_hyperopt(&mut self) -> Option<&mut dyn HyperoptBackend> {
        None
    }
}

/// Optional capability: incremental learning from additional documents.
pub trait LearningBackend: Backend {
    fn learn(&mut self, corpus: Box<dyn DocumentCorpus>, params: &ParamMap) -> Result<()>;
}
