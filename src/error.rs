//! Error types for the blend engine.
//!
//! Only loading and configuration can fail. The fusion and search core never
//! returns an error: degenerate input is absorbed by its fallbacks, and the
//! "not found" cases are [`Outcome`](crate::core::types::Outcome) variants.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for loading and configuration.
pub type Result<T> = std::result::Result<T, BlendError>;

#[derive(Error, Debug)]
pub enum BlendError {
    /// I/O failure while reading or writing a data file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The candidate dataset is required and could not be found
    #[error("dataset not found: {path}")]
    DatasetMissing { path: PathBuf },

    /// A tabular input file could not be parsed
    #[error("malformed data in {path}: {message}")]
    Data { path: PathBuf, message: String },

    /// Configuration file is unreadable or invalid
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Model snapshot could not be encoded or decoded
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}

impl BlendError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn data(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Data {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn snapshot(message: impl ToString) -> Self {
        Self::Snapshot {
            message: message.to_string(),
        }
    }
}
