//! Integration tests for the archive pipeline
//!
//! Pipeline properties run against a counting fake fetcher; the HTTP
//! fetcher is exercised against wiremock servers.

mod archive_tests;
mod common;
