//! Archive entries
//!
//! Each archived link lives in `<output>/<link id>/index.html`: a YAML
//! preamble between `---` lines followed by the extracted body. Entries are
//! assembled in a staging directory and renamed into place, so an entry
//! directory either holds a complete artifact or does not exist.

use crate::links::LinkId;
use crate::storage::error::WriteError;
use crate::storage::Metadata;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File holding the preamble and body inside an entry directory
pub const ENTRY_FILE_NAME: &str = "index.html";

/// Name prefix of in-progress entry directories
pub const STAGING_PREFIX: &str = ".staging-";

const PREAMBLE_DELIMITER: &str = "---";

/// Writes archive entries under a root directory
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    root: PathBuf,
}

impl ArchiveWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory an entry for `id` lives in
    pub fn entry_path(&self, id: &LinkId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Returns true if a completed entry for `id` is on disk
    pub fn entry_exists(&self, id: &LinkId) -> bool {
        self.entry_path(id).exists()
    }

    /// Persists a new archive entry
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier naming the entry directory
    /// * `metadata` - Serialized as the YAML preamble
    /// * `body` - Extracted page content, written verbatim after the preamble
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written entry file
    /// * `Err(WriteError::AlreadyExists)` - An entry for `id` is already present
    /// * `Err(WriteError)` - The entry could not be written
    pub fn write(
        &self,
        id: &LinkId,
        metadata: &Metadata,
        body: &str,
    ) -> Result<PathBuf, WriteError> {
        let final_dir = self.entry_path(id);
        if final_dir.exists() {
            return Err(WriteError::AlreadyExists(final_dir));
        }

        let content = render_entry(metadata, body)?;

        let staging_dir = self.root.join(format!("{}{}", STAGING_PREFIX, id));
        remove_staging(&staging_dir)?;
        std::fs::create_dir(&staging_dir).map_err(|e| WriteError::io(&staging_dir, e))?;

        let staged_file = staging_dir.join(ENTRY_FILE_NAME);
        let mut file =
            std::fs::File::create(&staged_file).map_err(|e| WriteError::io(&staged_file, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| WriteError::io(&staged_file, e))?;
        file.sync_all().map_err(|e| WriteError::io(&staged_file, e))?;
        drop(file);

        std::fs::rename(&staging_dir, &final_dir).map_err(|e| WriteError::io(&final_dir, e))?;

        Ok(final_dir.join(ENTRY_FILE_NAME))
    }

    /// Removes staging leftovers from an interrupted run
    ///
    /// Both directories and stray files carrying the staging prefix are
    /// removed. Returns the number of leftovers removed.
    pub fn sweep_staging(&self) -> Result<usize, WriteError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| WriteError::io(&self.root, e))?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| WriteError::io(&self.root, e))?;
            let is_staging = entry
                .file_name()
                .as_encoded_bytes()
                .starts_with(STAGING_PREFIX.as_bytes());

            if is_staging {
                tracing::warn!(
                    "Removing incomplete archive entry {}",
                    entry.path().display()
                );
                if remove_staging(&entry.path())? {
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }
}

/// Deletes whatever sits at a staging path, without following symlinks
///
/// Returns false when nothing was there.
fn remove_staging(path: &Path) -> Result<bool, WriteError> {
    let meta = match std::fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(WriteError::io(path, e)),
    };

    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| WriteError::io(path, e))?;
    Ok(true)
}

/// Formats the preamble and body as a single artifact
fn render_entry(metadata: &Metadata, body: &str) -> Result<String, WriteError> {
    let yaml = serde_yaml::to_string(metadata)?;
    Ok(format!(
        "{delim}\n{}\n{delim}\n{}",
        yaml.trim_matches('\n'),
        body,
        delim = PREAMBLE_DELIMITER
    ))
}

/// Reads an archive entry back into its metadata and body
pub fn read_entry(root: &Path, id: &LinkId) -> Result<(Metadata, String), WriteError> {
    let path = root.join(id.as_str()).join(ENTRY_FILE_NAME);
    let content = std::fs::read_to_string(&path).map_err(|e| WriteError::io(&path, e))?;

    let invalid = |reason: &str| WriteError::InvalidEntry {
        path: path.clone(),
        reason: reason.to_string(),
    };

    let rest = content
        .strip_prefix("---\n")
        .ok_or_else(|| invalid("missing opening delimiter"))?;
    let (yaml, body) = rest
        .split_once("\n---\n")
        .ok_or_else(|| invalid("missing closing delimiter"))?;

    let metadata: Metadata = serde_yaml::from_str(yaml)?;
    Ok((metadata, body.to_string()))
}
