//! Archiver module: the archival pipeline
//!
//! This module contains the core archiving logic, including:
//! - Walking the input tree for markdown documents
//! - Fetching linked pages and extracting readable content
//! - Coordinating identifiers, the checked-links cache and archive writes

mod coordinator;
mod fetcher;
mod parser;
mod walker;

pub use coordinator::{run_archive, Archiver};
pub use fetcher::{build_http_client, ContentFetcher, FetchError, FetchedContent, HttpFetcher};
pub use parser::{extract_readable, ReadablePage};
pub use walker::{find_markdown_files, is_markdown_file};
