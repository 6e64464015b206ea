//! Record loading error types.

use std::path::PathBuf;

/// Errors raised while turning timed-text records into segments.
///
/// Only `ReadError` and `Json` fail a load. The per-record variants are
/// logged and the record is dropped.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Failed to read the records file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not JSON at all.
    #[error("Malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// A record entry is not an object.
    #[error("Record {index}: not an object")]
    NotAnObject { index: usize },

    /// Missing or unparseable start/end time.
    #[error("Record {index}: invalid timestamp '{value}'")]
    InvalidTimestamp { index: usize, value: String },

    /// End does not come after start.
    #[error("Record {index}: end {end} is not after start {start}")]
    InvalidInterval { index: usize, start: f64, end: f64 },

    /// Neither text nor tokens.
    #[error("Record {index}: no text or tokens")]
    EmptyPayload { index: usize },
}

impl RecordError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn timestamp(index: usize, value: impl std::fmt::Display) -> Self {
        Self::InvalidTimestamp {
            index,
            value: value.to_string(),
        }
    }

    /// True for errors that only affect a single record.
    pub fn is_record_local(&self) -> bool {
        !matches!(self, Self::ReadError { .. } | Self::Json(_))
    }
}
