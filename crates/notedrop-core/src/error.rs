//! Error handling
//!
//! Provides typed errors for note and watcher operations with descriptive
//! messages and path context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, mutating, or watching notes
#[derive(Error, Debug)]
pub enum NoteError {
    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File not found (when expected to exist)
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filesystem watcher error
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Invalid filename or link pattern
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl NoteError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, missing file, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => NoteError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => NoteError::NotFound { path },
            _ => NoteError::ReadError {
                path,
                source: error,
            },
        }
    }
}

/// Result type for note operations
pub type NoteResult<T> = Result<T, NoteError>;
