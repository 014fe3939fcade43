//! Content fetcher implementation
//!
//! This module handles turning a link into readable content:
//! - The `ContentFetcher` trait the coordinator depends on
//! - An HTTP implementation built on reqwest
//! - Error classification for failed fetches

use crate::archiver::parser::extract_readable;
use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed per fetch
const MAX_REDIRECTS: usize = 10;

/// Readable content obtained for a link
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedContent {
    /// Page title, empty when none was found
    pub title: String,

    /// Extracted body HTML
    pub body: String,
}

/// Reasons a fetch can fail
///
/// All of these are per-link failures: the coordinator logs them, records
/// the link as checked, and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Expected HTML, got {0}")]
    ContentMismatch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not extract content: {0}")]
    Extraction(String),
}

/// Source of readable content for a link
///
/// The coordinator only talks to this trait, so tests can substitute a
/// deterministic fake for real network access.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches `url` and extracts its title and body within `timeout`
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedContent, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use link_archiver::archiver::build_http_client;
/// use link_archiver::config::FetcherConfig;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP and runs readable content extraction on them
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `config`
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    /// Fetches a URL and extracts readable content
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Non-2xx status | `Status` |
    /// | Content-Type present and not HTML | `ContentMismatch` |
    /// | Request exceeds `timeout` | `Timeout` |
    /// | Connection, TLS, body read failure | `Network` |
    /// | No readable content in the page | `Extraction` |
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedContent, FetchError> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::Network(e.to_string())
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.is_empty() && !is_html(&content_type) {
            return Err(FetchError::ContentMismatch(content_type));
        }

        let html = response.text().await.map_err(classify)?;
        let page = extract_readable(&html, Some(url)).map_err(FetchError::Extraction)?;

        Ok(FetchedContent {
            title: page.title,
            body: page.content,
        })
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
