//! Storage module for persisting archive state
//!
//! This module handles everything the archiver keeps on disk:
//! - The checked-links cache (`.checked_links.txt`)
//! - Archive entries, one directory per link identifier
//! - The metadata preamble written at the top of each entry

mod archive;
mod checked_links;
mod error;

pub use archive::{read_entry, ArchiveWriter, ENTRY_FILE_NAME, STAGING_PREFIX};
pub use checked_links::{CheckedLinks, CACHE_FILE_NAME};
pub use error::{CacheError, WriteError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata recorded alongside an archived page
///
/// Created once when a link is archived and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// The link as it appeared in the source document
    pub url: String,

    /// Extracted page title, empty when the page had none
    pub title: String,

    /// When the entry was written
    pub archived_at: DateTime<Utc>,
}

impl Metadata {
    /// Creates metadata stamped with the current time
    pub fn now(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            archived_at: Utc::now(),
        }
    }
}
