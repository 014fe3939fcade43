//! Markdown link extraction
//!
//! Known limitation: a link needs one character other than `!` in front of
//! its opening bracket. A link at the very start of a document is therefore
//! not found, and neither is a link that directly follows another link's
//! closing parenthesis, since that parenthesis was consumed by the previous
//! match.

use regex::Regex;
use std::sync::LazyLock;

// [^!]                 one char that is not `!` (rules out image links)
// \[[^\[\]]+\]         label of 1+ non-bracket chars
// \((https?://[^()]+)\) captured http(s) URL with at least one char after the scheme
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^!]\[[^\[\]]+\]\((https?://[^()]+)\)").expect("valid regex")
});

/// Extracts absolute HTTP(S) link targets from markdown text
///
/// Links are returned in document order. Duplicates are kept; deduplication
/// happens later by link identifier.
///
/// # Example
///
/// ```
/// use link_archiver::links::extract_links;
///
/// let links = extract_links(" [docs](https://example.com/docs) ![logo](https://example.com/logo.png)");
/// assert_eq!(links, vec!["https://example.com/docs"]);
/// ```
pub fn extract_links(markdown: &str) -> Vec<String> {
    MARKDOWN_LINK_RE
        .captures_iter(markdown)
        .map(|c| c[1].to_string())
        .collect()
}
