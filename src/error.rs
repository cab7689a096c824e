//! Error types for FileTable
//!
//! Provides a unified error type for all table operations.

use std::io;

use thiserror::Error;

/// Result type alias using FileTableError
pub type Result<T> = std::result::Result<T, FileTableError>;

/// Unified error type for FileTable operations
#[derive(Debug, Error)]
pub enum FileTableError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    #[error("Key has no snapshots")]
    NoSnapshots,

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Header size mismatch: declared {declared} bytes, index needs {consumed}")]
    HeaderSizeMismatch { declared: u64, consumed: u64 },

    #[error("Snapshot {index} declares {declared} bytes but holds {actual}")]
    SnapshotSizeMismatch {
        index: usize,
        declared: u64,
        actual: u64,
    },

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key file name: {0}")]
    KeyDecode(#[from] base64::DecodeError),

    #[error("Empty key cannot be stored")]
    EmptyKey,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[source] io::Error),
}

impl FileTableError {
    /// True for a missing key file
    pub fn is_not_found(&self) -> bool {
        matches!(self, FileTableError::NotFound)
    }
}

impl From<io::Error> for FileTableError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FileTableError::NotFound,
            _ => FileTableError::Io(err),
        }
    }
}
