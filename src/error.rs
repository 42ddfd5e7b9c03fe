//! Error types for Grove.

use std::io;

use thiserror::Error;

/// Grove error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is missing or invalid.
    #[error("project '{project_id}': {message}")]
    Configuration { message: String, project_id: String },

    /// A configuration file could not be parsed.
    #[error("configuration file error: {0}")]
    ConfigFile(String),

    /// Suggestion was requested on a project that is not trained.
    #[error("project '{project_id}' is not trained")]
    NotInitialized { project_id: String },

    /// A capability-gated operation was invoked on a backend lacking it.
    #[error("project '{project_id}': {message}")]
    NotSupported { message: String, project_id: String },

    /// No project with the given id is visible in the registry.
    #[error("no such project '{0}'")]
    ProjectNotFound(String),

    /// Vocabulary lookup or language resolution failed.
    #[error("vocabulary error: {0}")]
    Vocab(String),

    /// The backend implementation is not registered or not available.
    #[error("backend type '{0}' is not available")]
    BackendNotAvailable(String),

    /// Backend operation failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for Grove operations.
pub type Result<T> = std::result::Result<T, Error>;
