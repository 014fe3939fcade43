/// Terminal outcomes for a discovered link
///
/// Every link found in a document ends a run in exactly one of these states.
use std::fmt;

/// Represents how the coordinator finished with a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkOutcome {
    // ===== Terminal Success States =====
    /// Content was fetched and a new archive entry was written
    Archived,

    // ===== Terminal Skip States =====
    /// Identifier was already present in the checked-links cache
    SkippedCached,

    /// Archive entry already existed on disk though the cache did not list it
    SkippedOnDisk,

    // ===== Terminal Error States =====
    /// Fetching or extracting the content failed; recorded and not retried
    FetchFailed,

    /// The link could not be parsed into an identifier
    Malformed,
}

impl LinkOutcome {
    /// All outcomes, in reporting order
    pub const ALL: [LinkOutcome; 5] = [
        Self::Archived,
        Self::SkippedCached,
        Self::SkippedOnDisk,
        Self::FetchFailed,
        Self::Malformed,
    ];

    /// Returns true if no fetch was attempted
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedCached | Self::SkippedOnDisk)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::Malformed)
    }

    /// Returns true if the link's identifier is recorded in the cache
    ///
    /// Only malformed links, which have no identifier, are left out.
    pub fn marks_checked(&self) -> bool {
        !matches!(self, Self::Malformed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Archived => "archived",
            Self::SkippedCached => "skipped_cached",
            Self::SkippedOnDisk => "skipped_on_disk",
            Self::FetchFailed => "fetch_failed",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
