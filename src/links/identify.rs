//! Link identifiers
//!
//! A [`LinkId`] names both the archive entry directory and the cache line
//! for a link, so it has to be filesystem-safe and identical across runs.

use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Maximum number of characters kept from the normalized URL
pub const MAX_PREFIX_CHARS: usize = 100;

/// Number of hex characters of the SHA-256 digest appended to the prefix
pub const HASH_FRAGMENT_LEN: usize = 8;

/// Errors produced while deriving a link identifier
#[derive(Debug, Error)]
pub enum LinkIdError {
    #[error("Malformed URL {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Stable, filesystem-safe identifier for a link
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(String);

impl LinkId {
    /// Wraps an identifier read back from persisted state
    pub(crate) fn from_persisted(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The human-legible part before the hash fragment
    pub fn prefix(&self) -> &str {
        match self.0.rsplit_once('_') {
            Some((prefix, _)) => prefix,
            None => &self.0,
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LinkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives the identifier for a link
///
/// The identifier is the sanitized `host_path?query` string cut to
/// [`MAX_PREFIX_CHARS`] characters, followed by `_` and the first
/// [`HASH_FRAGMENT_LEN`] hex characters of the SHA-256 of the untruncated
/// sanitized string. Two URLs sharing a long common prefix still get
/// distinct identifiers.
///
/// Hosts are lowercased and a port equal to the scheme's default is
/// dropped, so `https://Example.com:443/x` and `https://example.com/x`
/// share an identifier.
///
/// # Example
///
/// ```
/// use link_archiver::links::identify;
///
/// let id = identify("https://example.com/posts/1?lang=en").unwrap();
/// assert!(id.as_str().starts_with("example.com__posts_1-lang-en_"));
/// ```
pub fn identify(link: &str) -> Result<LinkId, LinkIdError> {
    let url = Url::parse(link).map_err(|e| LinkIdError::Malformed {
        url: link.to_string(),
        reason: e.to_string(),
    })?;

    let host = url.host_str().ok_or_else(|| LinkIdError::Malformed {
        url: link.to_string(),
        reason: "missing host".to_string(),
    })?;

    let authority = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let normalized = normalize(&format!("{}_{}", authority, request_path(&url)));

    let digest = hex::encode(Sha256::digest(normalized.as_bytes()));
    let prefix: String = normalized.chars().take(MAX_PREFIX_CHARS).collect();

    Ok(LinkId(format!(
        "{}_{}",
        prefix,
        &digest[..HASH_FRAGMENT_LEN]
    )))
}

/// Path plus query, as it would appear on an HTTP request line
fn request_path(url: &Url) -> String {
    let path = if url.path().is_empty() { "/" } else { url.path() };
    match url.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    }
}

/// Maps separators and drops everything outside `[A-Za-z0-9_?=.-]`
fn normalize(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| match c {
            '/' => '_',
            '?' | '=' => '-',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '?' | '=' | '.' | '-'))
        .collect();

    mapped.trim_end_matches('_').to_string()
}
