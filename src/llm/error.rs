//! Reasoning backend errors

use thiserror::Error;

/// Errors raised while starting, resuming or running a reasoning thread
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// The provider rejected or failed the request
    #[error("{provider} request failed: {message}")]
    Api { provider: String, message: String },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Thread not found: {id}")]
    ThreadNotFound { id: String },

    #[error("Invalid thread id '{id}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidThreadId { id: String },

    /// Reading or writing a thread transcript failed
    #[error("Thread transcript error: {0}")]
    Transcript(String),

    #[error("{0}")]
    Other(String),
}

impl ReasoningError {
    pub(crate) fn transcript(err: anyhow::Error) -> Self {
        ReasoningError::Transcript(format!("{:#}", err))
    }
}
