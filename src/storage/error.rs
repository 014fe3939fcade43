//! Storage error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing the checked-links cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors creating or reading an archive entry
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Archive entry already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize metadata: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Invalid archive entry {path}: {reason}")]
    InvalidEntry { path: PathBuf, reason: String },
}

impl WriteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
