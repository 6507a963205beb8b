//! Error taxonomy for the similarity engine and its ingestion boundary.
//!
//! Per-file errors (`UnsupportedType`, `DecodeError`, `ExtractionError`,
//! `PathError`) travel inside the `Result<Media>` stream produced by
//! [`crate::ingest`]; `InternalError` should never surface for validated
//! input and exists to make DSU/DTW precondition violations loud rather
//! than silent.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MediaSimError {
    #[error("{message}")]
    InputError { message: String },

    #[error("cannot access path '{path}': {source}")]
    PathError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type for '{path}'")]
    UnsupportedType { path: PathBuf },

    #[error("failed to decode '{path}': {message}")]
    DecodeError { path: PathBuf, message: String },

    #[error("failed to extract frames from '{path}': {message}")]
    ExtractionError { path: PathBuf, message: String },

    #[error("internal invariant violated: {message}")]
    InternalError { message: String },
}

pub type Result<T> = std::result::Result<T, MediaSimError>;
