//! Custom error types for the sdf-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Only structural failures end up here. Content-level anomalies found while
/// indexing are collected as [`FormatWarning`](super::models::FormatWarning)s
/// instead of being raised.
#[derive(Debug, Error)]
pub enum SdfError {
    /// An error originating from I/O operations (open, read, seek).
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// A single-record re-parse at a known offset hit a malformed record.
    #[error("Malformed record at byte offset {offset}: {reason}")]
    MalformedRecord { offset: u64, reason: String },

    /// No record starts at or after the requested offset.
    #[error("No record found at byte offset {offset}")]
    RecordNotFound { offset: u64 },

    /// A user-supplied synonym pattern failed to compile.
    #[error("Invalid synonym pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A mutex lock was poisoned, indicating a panic in another thread holding the lock.
    #[error("A mutex lock was poisoned, indicating a panic in another thread holding the lock.")]
    LockPoisoned,
}

/// A convenience `Result` type alias using the crate's `SdfError` type.
pub type Result<T> = std::result::Result<T, SdfError>;
