//! Checked-links cache
//!
//! A newline-delimited list of link identifiers that have already been
//! attempted. The file is read once when a run starts and rewritten in full,
//! sorted, when it ends.

use crate::links::LinkId;
use crate::storage::error::CacheError;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the cache inside the output directory
pub const CACHE_FILE_NAME: &str = ".checked_links.txt";

/// In-memory view of the checked-links cache
///
/// Membership means "attempted", not "archived": failed fetches are recorded
/// too, so they are not retried on later runs.
#[derive(Debug)]
pub struct CheckedLinks {
    path: PathBuf,
    ids: HashSet<LinkId>,
}

impl CheckedLinks {
    /// Loads the cache from `<output_dir>/.checked_links.txt`
    ///
    /// A missing file yields an empty cache. Blank lines are ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(CheckedLinks)` - Cache loaded (possibly empty)
    /// * `Err(CacheError)` - The file exists but could not be read
    pub fn load(output_dir: &Path) -> Result<Self, CacheError> {
        let path = output_dir.join(CACHE_FILE_NAME);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cache at {}, starting empty", path.display());
                String::new()
            }
            Err(source) => return Err(CacheError::Read { path, source }),
        };

        let ids: HashSet<LinkId> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(LinkId::from_persisted)
            .collect();

        tracing::debug!("Loaded {} checked links from {}", ids.len(), path.display());

        Ok(Self { path, ids })
    }

    pub fn contains(&self, id: &LinkId) -> bool {
        self.ids.contains(id)
    }

    /// Records an attempt for `id`
    pub fn mark_checked(&mut self, id: LinkId) {
        self.ids.insert(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifiers in sorted order, as they are written to disk
    pub fn sorted_ids(&self) -> Vec<&LinkId> {
        let mut ids: Vec<&LinkId> = self.ids.iter().collect();
        ids.sort();
        ids
    }

    /// Rewrites the cache file with every identifier, one per line, sorted
    ///
    /// The content goes to a sibling temporary file first and is renamed over
    /// the cache file, so a crash never leaves a truncated cache behind.
    pub fn flush(&self) -> Result<(), CacheError> {
        let mut content = String::new();
        for id in self.sorted_ids() {
            content.push_str(id.as_str());
            content.push('\n');
        }

        let tmp_path = self.path.with_extension("txt.tmp");
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = std::fs::File::create(&tmp_path).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        std::fs::rename(&tmp_path, &self.path).map_err(write_err)?;

        tracing::debug!(
            "Flushed {} checked links to {}",
            self.ids.len(),
            self.path.display()
        );
        Ok(())
    }
}
