//! Error types for roadmap-graph operations.
//!
//! The graph engine itself is total: building snapshots, searching for the
//! critical path and computing layouts never fail, and degenerate input maps
//! to empty output. Errors only arise at the edges of the crate, when reading
//! configuration or roadmap documents from disk.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for roadmap-graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for loading configuration and input documents.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// A roadmap document was not valid JSON or did not match the expected shape
    #[error("invalid roadmap document: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file or values
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O error with the path that caused it.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
