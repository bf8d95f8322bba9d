//! Error taxonomy shared by every extraction stage.
//!
//! Each stage reports failures through [`ExtractError`]. The top-level command
//! maps a recognized kind to exit code 1 and anything else to exit code 2.

use std::path::PathBuf;
use thiserror::Error;

/// Flat classification of extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Syntax,
    MissingField,
    Load,
    Write,
    Unknown,
}

impl ErrorKind {
    /// Whether the kind is an expected failure with a short user-facing message.
    pub fn is_recognized(self) -> bool {
        !matches!(self, ErrorKind::Unknown)
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid configuration file {}: {message}", .path.display())]
    Syntax { path: PathBuf, message: String },

    #[error("Missing required configuration field '{field}' in {}", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Failed to load parameter-set {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Unknown(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::NotFound { .. } => ErrorKind::NotFound,
            ExtractError::Syntax { .. } => ErrorKind::Syntax,
            ExtractError::MissingField { .. } => ErrorKind::MissingField,
            ExtractError::Load { .. } => ErrorKind::Load,
            ExtractError::Write { .. } => ErrorKind::Write,
            ExtractError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ExtractError::Load { path: path.into(), message: message.to_string() }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Write { path: path.into(), source }
    }
}

/// Find the first recognized [`ExtractError`] in an error chain.
pub fn recognized(err: &anyhow::Error) -> Option<&ExtractError> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ExtractError>())
        .find(|e| e.kind().is_recognized())
}
