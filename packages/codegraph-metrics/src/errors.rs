//! Error types for codegraph-metrics
//!
//! Per-file and per-record problems are never surfaced: unreadable files,
//! truncated report blocks and malformed fields all degrade to "no data".
//! Only failures that make a whole operation meaningless end up here.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for codegraph-metrics operations
#[derive(Debug, Error)]
pub enum MetricsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error on the scan root itself
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Scan root does not exist
    #[error("Scan root does not exist: {0:?}")]
    RootNotFound(PathBuf),

    /// Scan root is not a directory
    #[error("Scan root is not a directory: {0:?}")]
    NotADirectory(PathBuf),

    /// Worker pool could not be built
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<rayon::ThreadPoolBuildError> for MetricsError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        MetricsError::ThreadPool(e.to_string())
    }
}

/// Result type alias for codegraph-metrics operations
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Reason an analysis run did not produce a payload.
///
/// The engine's own error type is erased to its message so that metrics
/// records stay `Clone` and `Send` regardless of which engine produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("analysis failed: {message}")]
pub struct AnalysisFailure {
    message: String,
}

impl AnalysisFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Capture any displayable engine error
    pub fn from_error(err: impl fmt::Display) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
