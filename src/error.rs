//! Error types for dyld cache record decoding.
//!
//! Decoding either returns a fully populated value or one of these errors;
//! there are no partial results and nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for record decoding and type registration.
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to memory map file '{path}': {source}")]
    MemoryMap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ==================== Reader Errors ====================
    #[error("truncated data at offset {offset:#x}: need {needed} bytes, have {available}")]
    Truncated {
        offset: u64,
        needed: usize,
        available: usize,
    },

    #[error("seek to {offset:#x} out of bounds (length: {len:#x})")]
    SeekOutOfBounds { offset: u64, len: u64 },

    // ==================== Type Catalog Errors ====================
    #[error("data type '{name}' in {category} already exists with a different layout")]
    DuplicateName { name: String, category: String },

    // ==================== Argument Errors ====================
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A specialized Result type for record decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the error means the data ran out before a read completed.
    #[inline]
    pub fn is_truncation(&self) -> bool {
        match self {
            Error::Truncated { .. } => true,
            Error::Io(err) => err.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }

    /// Creates a truncation error.
    #[inline]
    pub fn truncated(offset: u64, needed: usize, available: usize) -> Self {
        Error::Truncated {
            offset,
            needed,
            available,
        }
    }

    /// Creates a duplicate name error for a type in the given category.
    #[inline]
    pub fn duplicate_name(name: impl Into<String>, category: impl ToString) -> Self {
        Error::DuplicateName {
            name: name.into(),
            category: category.to_string(),
        }
    }
}
