//! Input tree traversal

use crate::ArchiveError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const MARKDOWN_SUFFIXES: [&[u8]; 2] = [b".md", b".markdown"];

/// Returns true for paths ending in `.md` or `.markdown`
///
/// Matches on the raw path bytes, so names that are not valid UTF-8 count.
pub fn is_markdown_file(path: &Path) -> bool {
    let bytes = path.as_os_str().as_encoded_bytes();
    MARKDOWN_SUFFIXES
        .iter()
        .any(|suffix| bytes.ends_with(suffix))
}

/// Recursively collects markdown files under `root`
///
/// Entries are visited in sorted file-name order so runs are reproducible.
/// Hidden files and ignore files get no special treatment, and symlinked
/// directories are not followed. Any I/O error during the walk aborts it.
pub fn find_markdown_files(root: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| traversal_error(root, e))?;

        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if !is_dir && is_markdown_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn traversal_error(root: &Path, err: ignore::Error) -> ArchiveError {
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message));
    ArchiveError::Traversal {
        path: root.to_path_buf(),
        source,
    }
}
