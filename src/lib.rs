//! Link Archiver: keeps a local copy of every page a markdown tree links to
//!
//! This crate walks a directory of markdown documents, extracts outbound
//! HTTP(S) links, and archives a readable copy of each linked page exactly
//! once, tracking what it has already attempted across runs.

pub mod archiver;
pub mod config;
pub mod links;
pub mod output;
pub mod state;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archive runs
///
/// Everything that reaches this type is fatal to the run. Per-link failures
/// (malformed URLs, fetch errors) are handled inside the coordinator and
/// never surface here.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Traversal {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] storage::CacheError),

    #[error("Archive write error: {0}")]
    Write(#[from] storage::WriteError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{role} directory does not exist: {path}")]
    MissingDirectory { role: &'static str, path: PathBuf },

    #[error("{role} is not a directory: {path}")]
    NotADirectory { role: &'static str, path: PathBuf },
}

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use archiver::{Archiver, ContentFetcher, FetchError, FetchedContent, HttpFetcher};
pub use config::Config;
pub use links::{extract_links, identify, LinkId, LinkIdError};
pub use output::RunStatistics;
pub use state::LinkOutcome;
pub use storage::{ArchiveWriter, CheckedLinks, Metadata};
