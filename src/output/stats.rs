//! Run statistics
//!
//! Counters collected by the coordinator while it works through the input
//! tree, and helpers to report them.

use crate::state::LinkOutcome;
use std::collections::BTreeMap;

/// Summary of a single archive run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Number of markdown documents read
    pub documents_scanned: usize,

    /// Number of links extracted, duplicates included
    pub links_discovered: usize,

    /// Leftover staging directories removed at startup
    pub staging_removed: usize,

    /// Count of links per terminal outcome
    pub outcomes: BTreeMap<LinkOutcome, usize>,
}

impl RunStatistics {
    /// Records one link reaching `outcome`
    pub fn record(&mut self, outcome: LinkOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: LinkOutcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Links that needed no fetch
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_skipped())
            .map(|(_, count)| count)
            .sum()
    }

    /// Links for which a fetch was attempted
    pub fn fetch_attempts(&self) -> usize {
        self.count(LinkOutcome::Archived) + self.count(LinkOutcome::FetchFailed)
    }

    /// Per-link errors (failed fetches and malformed links)
    pub fn errors(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_error())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Formats statistics as a short multi-line report
pub fn format_statistics(stats: &RunStatistics) -> String {
    let mut out = String::new();
    out.push_str(&format!("Documents scanned: {}\n", stats.documents_scanned));
    out.push_str(&format!("Links discovered: {}\n", stats.links_discovered));
    for outcome in LinkOutcome::ALL {
        out.push_str(&format!("  {}: {}\n", outcome, stats.count(outcome)));
    }
    if stats.staging_removed > 0 {
        out.push_str(&format!(
            "Incomplete entries removed: {}\n",
            stats.staging_removed
        ));
    }
    out
}

/// Logs the statistics line by line at info level
pub fn log_statistics(stats: &RunStatistics) {
    for line in format_statistics(stats).lines() {
        tracing::info!("{}", line);
    }
}
