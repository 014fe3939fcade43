//! Archive coordinator - main archival orchestration logic
//!
//! This module contains the run loop that ties the pipeline together:
//! - Loading the checked-links cache and clearing stale staging entries
//! - Walking the input tree and extracting links per document
//! - Driving each link through cache check, disk check, fetch and write
//! - Flushing the cache once the whole tree has been processed
//!
//! # Per-link state machine
//!
//! ```text
//! Discovered -> CacheChecked -> { SkippedCached | DiskChecked }
//! DiskChecked -> { SkippedOnDisk | Fetch }
//! Fetch -> { Archived | FetchFailed }
//! ```
//!
//! Every identified link ends up in the cache whatever its outcome, so a
//! failed fetch is not retried on later runs.

use crate::archiver::fetcher::{ContentFetcher, FetchError, FetchedContent, HttpFetcher};
use crate::archiver::walker::find_markdown_files;
use crate::config::Config;
use crate::links::{extract_links, identify, LinkId};
use crate::output::RunStatistics;
use crate::state::LinkOutcome;
use crate::storage::{ArchiveWriter, CheckedLinks, Metadata};
use crate::ArchiveError;
use futures::StreamExt;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Main archiver structure
///
/// Owns the configuration, the content fetcher and the archive writer. The
/// checked-links cache is created per run and never shared.
pub struct Archiver {
    config: Config,
    fetcher: Arc<dyn ContentFetcher>,
    writer: ArchiveWriter,
}

impl Archiver {
    /// Creates an archiver using the given content fetcher
    pub fn new(config: Config, fetcher: Arc<dyn ContentFetcher>) -> Self {
        let writer = ArchiveWriter::new(&config.output_dir);
        Self {
            config,
            fetcher,
            writer,
        }
    }

    /// Creates an archiver that fetches over HTTP
    pub fn with_http_fetcher(config: Config) -> Result<Self, ArchiveError> {
        let fetcher = HttpFetcher::from_config(&config.fetcher)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one archival pass over the input tree
    ///
    /// Per-link failures are logged and counted in the returned statistics.
    /// Errors reading the tree, writing an entry or touching the cache abort
    /// the run, in which case the cache is not flushed.
    pub async fn run(&self) -> Result<RunStatistics, ArchiveError> {
        tracing::info!(
            "Archiving links from {} into {}",
            self.config.input_dir.display(),
            self.config.output_dir.display()
        );

        let mut stats = RunStatistics::default();
        stats.staging_removed = self.writer.sweep_staging()?;

        let mut cache = CheckedLinks::load(&self.config.output_dir)?;
        tracing::info!("Loaded {} previously checked links", cache.len());

        let documents = find_markdown_files(&self.config.input_dir)?;
        tracing::info!("Found {} markdown documents", documents.len());

        for path in &documents {
            self.process_document(path, &mut cache, &mut stats).await?;
        }

        cache.flush()?;

        tracing::info!(
            "Run complete: {} archived, {} failed, {} skipped",
            stats.count(LinkOutcome::Archived),
            stats.count(LinkOutcome::FetchFailed),
            stats.skipped()
        );

        Ok(stats)
    }

    /// Processes every link in a single document
    ///
    /// Identification and both existence checks happen here, on the owning
    /// task. Only fetches run concurrently, and their results are applied in
    /// document order as they complete.
    async fn process_document(
        &self,
        path: &Path,
        cache: &mut CheckedLinks,
        stats: &mut RunStatistics,
    ) -> Result<(), ArchiveError> {
        tracing::debug!("Scanning {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| ArchiveError::Traversal {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let links = extract_links(&text);
        stats.documents_scanned += 1;
        stats.links_discovered += links.len();

        let mut scheduled: HashSet<LinkId> = HashSet::new();
        let mut pending: Vec<(LinkId, String)> = Vec::new();

        for link in links {
            let id = match identify(&link) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Skipping link in {}: {}", path.display(), e);
                    stats.record(LinkOutcome::Malformed);
                    continue;
                }
            };

            if cache.contains(&id) || scheduled.contains(&id) {
                tracing::debug!("Already checked {}", link);
                stats.record(LinkOutcome::SkippedCached);
                continue;
            }

            if self.writer.entry_exists(&id) {
                // Entry survived a run whose cache was never flushed
                tracing::debug!("Found existing archive entry for {}, updating cache", link);
                cache.mark_checked(id);
                stats.record(LinkOutcome::SkippedOnDisk);
                continue;
            }

            scheduled.insert(id.clone());
            pending.push((id, link));
        }

        if pending.is_empty() {
            return Ok(());
        }

        let timeout = self.config.fetcher.timeout();
        let fetcher = &self.fetcher;

        let mut fetches = futures::stream::iter(pending)
            .map(|(id, link)| async move {
                let result = match tokio::time::timeout(timeout, fetcher.fetch(&link, timeout)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout(timeout)),
                };
                (id, link, result)
            })
            .buffered(self.config.fetcher.max_concurrent_fetches);

        while let Some((id, link, result)) = fetches.next().await {
            let outcome = self.complete_link(cache, id, &link, result)?;
            stats.record(outcome);
        }

        Ok(())
    }

    /// Applies a fetch result: writes the entry on success, then marks checked
    fn complete_link(
        &self,
        cache: &mut CheckedLinks,
        id: LinkId,
        link: &str,
        result: Result<FetchedContent, FetchError>,
    ) -> Result<LinkOutcome, ArchiveError> {
        match result {
            Ok(content) => {
                let metadata = Metadata::now(link, content.title);
                let entry = self.writer.write(&id, &metadata, &content.body)?;
                tracing::info!("Archived {} -> {}", link, entry.display());
                cache.mark_checked(id);
                Ok(LinkOutcome::Archived)
            }
            Err(e) => {
                tracing::warn!("Cannot archive {}: {}", link, e);
                cache.mark_checked(id);
                Ok(LinkOutcome::FetchFailed)
            }
        }
    }
}

/// Runs a complete archive pass with the HTTP fetcher
///
/// # Example
///
/// ```no_run
/// use link_archiver::archiver::run_archive;
/// use link_archiver::config::Config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = run_archive(Config::new("notes", "archive")).await?;
/// println!("{} links archived", stats.count(link_archiver::LinkOutcome::Archived));
/// # Ok(())
/// # }
/// ```
pub async fn run_archive(config: Config) -> Result<RunStatistics, ArchiveError> {
    let archiver = Archiver::with_http_fetcher(config)?;
    archiver.run().await
}
