use super::options::ValidationError;
use crate::config::ConfigError;
use crate::llm::ReasoningError;
use std::path::PathBuf;
use thiserror::Error;

/// Any failure that ends an invocation with exit code 1
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to read CI log {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reasoning service error: {0}")]
    Reasoning(#[from] ReasoningError),

    #[error("Failed to write run output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Stable category name used in the error log event
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Config(_) => "ConfigurationError",
            RunError::Validation(_) => "ValidationError",
            RunError::Io { .. } => "IOError",
            RunError::Reasoning(_) => "ReasoningServiceError",
            RunError::Output { .. } => "OutputError",
        }
    }
}
