//! Error types for fair-attendance.
//!
//! Loading fails only on file access, on strict-mode markup problems, or on
//! caller-supplied selectors that do not parse.

use std::io;
use std::path::PathBuf;

/// Error type for loading and querying parse trees.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Markup rejected by the strict parser.
    #[error("HTML parsing failed at line {line}: {message}")]
    Parse {
        /// 1-based line of the offending tag.
        line: usize,
        /// What was wrong with the markup.
        message: String,
    },

    /// A CSS selector passed to `select` could not be compiled.
    #[error("invalid selector: {0}")]
    Selector(String),

    /// The tree could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Kind of the underlying I/O failure, if this is a file-access error.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// True when the input file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, Error>;
