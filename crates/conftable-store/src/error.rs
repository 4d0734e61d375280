//! Error types for the conftable-store crate.
//!
//! All store operations return [`StoreError`] via [`StoreResult`].
//! A missing participants file or message log is never an error; it reads
//! as an empty table.

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing a conference table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line of the message log could not be parsed.
    #[error("corrupt message log at line {line}: {source}")]
    CorruptLog {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A remote conference table rejected the request or could not be reached.
    #[error("remote table error: {0}")]
    Remote(String),

    /// The operation is not offered by this kind of table.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}
