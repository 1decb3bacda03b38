use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("write conflict: {0}")]
    WriteConflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("failed to decode content: {0}")]
    Decode(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("repository host error: {0}")]
    RepositoryHost(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error("review aborted: {0}")]
    ReviewAborted(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    /// A missing resource is routinely used to pick a branch of behaviour
    /// (create vs update, heuristic vs sentinel) rather than to fail.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
