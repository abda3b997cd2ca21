//! Configuration management and validation
//!
//! Processing parameters for an extraction run: target-station set, input
//! and output locations, resume behavior, and worker count. Validation runs
//! once before any page processing begins; it is the only place a run can
//! fail fatally.

use crate::constants::{DEFAULT_OUTPUT_FILENAME, DEFAULT_TARGET_STATIONS, STATION_CODE_PATTERN};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Configuration for one extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Station codes to extract, uppercased
    pub target_stations: Vec<String>,

    /// Directory holding yearbook text dumps
    pub input_dir: PathBuf,

    /// Primary output CSV path
    pub output_file: PathBuf,

    /// Optional secondary sink for partial records
    pub review_file: Option<PathBuf>,

    /// Skip station-years already present in the output file
    pub resume: bool,

    /// Number of concurrent page-processing workers
    pub workers: usize,

    /// Render progress bars during processing
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_stations: DEFAULT_TARGET_STATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            input_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            review_file: None,
            resume: false,
            workers: num_cpus::get(),
            show_progress: true,
        }
    }
}

impl Config {
    /// Set the target-station list, normalizing codes to uppercase
    pub fn with_target_stations<I, S>(mut self, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.target_stations = stations
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Set the input directory
    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    /// Set the primary output path
    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = output_file.into();
        self
    }

    /// Enable the review sink for partial records
    pub fn with_review_file(mut self, review_file: impl Into<PathBuf>) -> Self {
        self.review_file = Some(review_file.into());
        self
    }

    /// Enable resume mode
    pub fn with_resume(mut self) -> Self {
        self.resume = true;
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Disable progress bars
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Pre-flight validation, the only fatal error path of a run
    pub fn validate(&self) -> Result<()> {
        if self.target_stations.is_empty() {
            return Err(Error::configuration("target station list is empty"));
        }

        let grammar = Regex::new(&format!("^{STATION_CODE_PATTERN}$"))
            .map_err(|e| Error::configuration(format!("station code grammar invalid: {e}")))?;
        for code in &self.target_stations {
            if !grammar.is_match(code) {
                return Err(Error::configuration(format!(
                    "station code '{code}' does not match the code grammar"
                )));
            }
        }

        if self.workers == 0 {
            return Err(Error::configuration("worker count must be at least 1"));
        }

        if !self.input_dir.is_dir() {
            return Err(Error::configuration(format!(
                "input directory not found: {}",
                self.input_dir.display()
            )));
        }

        if self.resume && !self.output_file.is_file() {
            return Err(Error::configuration(format!(
                "resume requested but output file does not exist: {}",
                self.output_file.display()
            )));
        }

        debug!(
            stations = self.target_stations.len(),
            workers = self.workers,
            "configuration validated"
        );
        Ok(())
    }
}
