//! Configuration module for Link Archiver
//!
//! Settings come from an optional TOML file and from command-line flags,
//! with flags taking precedence. The merged result is validated once, before
//! any traversal starts.
//!
//! # Example
//!
//! ```no_run
//! use link_archiver::config::{load_config, resolve_config, ConfigOverrides};
//! use std::path::Path;
//!
//! let file = load_config(Path::new("archiver.toml")).unwrap();
//! let config = resolve_config(file, ConfigOverrides::default()).unwrap();
//! println!("Archiving into: {}", config.output_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ConfigOverrides, FetcherConfig, FileConfig, PathsConfig};

// Re-export parser functions
pub use parser::{load_config, resolve_config};
