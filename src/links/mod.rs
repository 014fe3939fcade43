//! Link handling for Link Archiver
//!
//! This module finds outbound links in markdown text and derives the stable
//! identifier each link is archived and cached under.

mod extract;
mod identify;

pub use extract::extract_links;
pub use identify::{identify, LinkId, LinkIdError, HASH_FRAGMENT_LEN, MAX_PREFIX_CHARS};
