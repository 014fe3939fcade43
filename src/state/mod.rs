//! State module for tracking per-link progress
//!
//! # Components
//!
//! - `LinkOutcome`: the terminal state a discovered link ends in during a run

mod link_outcome;

pub use link_outcome::LinkOutcome;
