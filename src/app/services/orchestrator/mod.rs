//! Extraction pipeline orchestration
//!
//! Ties the page classifier, the three extractors, the dedup index, and the
//! CSV sinks into one pipeline that a worker can feed documents through.
//!
//! The module is organized into logical components:
//! - [`processor`] - Main Orchestrator struct and the per-page state machine
//! - [`stats`] - Run statistics and the end-of-run summary
//!
//! # Error Philosophy
//!
//! Pages fail for many reasons (undecodable bytes, missing anchors, column
//! mismatches, duplicate station-years) and none of them may take down a
//! multi-hundred-page run. Everything page-local degrades to a [`RunStats`]
//! counter plus a log line; only sink I/O failures and cancellation
//! propagate as errors.

pub mod processor;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use processor::{Orchestrator, PageOutcome};
pub use stats::RunStats;
