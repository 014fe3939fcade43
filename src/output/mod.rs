//! Output module for reporting archive runs
//!
//! This module handles:
//! - Counting link outcomes during a run
//! - Logging a summary once the run completes

pub mod stats;

pub use stats::{format_statistics, log_statistics, RunStatistics};
