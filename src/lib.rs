//! Grove - project lifecycle and suggestion orchestration for automated
//! subject indexing.
//!
//! A project binds a language analyzer, a text transform pipeline, a
//! subject vocabulary and a pluggable classification backend behind one
//! uniform operation surface: suggest, train, learn, hyperparameter
//! optimization, introspection and teardown.

mod defaults;
mod util;

pub mod error;

pub mod analyzer;
pub mod backend;
pub mod corpus;
pub mod project;
pub mod suggestion;
pub mod transform;
pub mod vocab;

pub use error::{Error, Result};

pub use analyzer::{get_analyzer, Analyzer, SimpleAnalyzer, WhitespaceAnalyzer};

pub use backend::hyperopt::{HpOptimizer, HpRecommendation, HyperoptBackend, TrialRecord};
pub use backend::{Backend, BackendContext, DummyBackend, LearningBackend, ParamMap};

pub use corpus::{Document, DocumentCorpus, DocumentList, TrainingCorpus};

pub use project::registry::{BackendFactory, ComponentCatalog, ProjectRegistry};
pub use project::{
    Access, BackendParams, CorpusSuggestions, Project, ProjectConfig, ProjectInfo,
};

pub use suggestion::{SubjectSuggestion, SuggestionBatch, SuggestionVector};

pub use transform::{
    get_transform, InputLimiter, PassTransform, Transform, TransformChain, TransformContext,
};

pub use vocab::{Subject, Vocabulary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
