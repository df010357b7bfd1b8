use std::io;
use thiserror::Error;

/// Engine-wide error type, consolidating every failure an external collaborator can surface.
///
/// The local segmentation, classification and extraction paths never produce one of these:
/// they are infallible by signature and degrade to fallback records instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The text-extraction collaborator could not turn the file into text.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The generative-model collaborator failed or returned unusable output.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Generative JSON output could not be repaired into something parseable.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A message could not be delivered to, or answered by, an actor.
    #[error("Actor error: {0}")]
    Actor(String),

    /// Represents configuration-related errors (e.g., invalid environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents invalid caller input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Extraction(s) => AppError::Extraction(s.clone()),
            AppError::Generation(s) => AppError::Generation(s.clone()),
            AppError::Parse(s) => AppError::Parse(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::Actor(s) => AppError::Actor(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            AppError::Internal(format!("Background task panicked: {}", err))
        } else {
            AppError::Internal(format!("Background task cancelled: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Generation(format!("HTTP error: {}", err))
    }
}
