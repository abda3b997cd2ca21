//! Station-year deduplication
//!
//! Yearbooks reprint station pages (errata sections, combined volumes), and
//! a resumed run re-reads documents whose records already reached the output.
//! The index tracks claimed (station code, water year) keys so each
//! station-year is emitted exactly once per output file, whichever worker
//! reaches it first.

use crate::app::models::RecordKey;
use crate::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Thread-safe set of claimed station-year keys
#[derive(Debug, Default)]
pub struct DedupIndex {
    claimed: Mutex<HashSet<RecordKey>>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload keys from an existing output CSV so a resumed run skips
    /// station-years that already reached the file.
    ///
    /// Expects `station_code` and `year` columns in the header; anything
    /// else in the file is ignored. Unreadable rows are skipped.
    pub fn preload_from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            Error::output_sink(
                format!("cannot read existing output {}", path.display()),
                Some(e),
            )
        })?;

        let headers = reader
            .headers()
            .map_err(|e| Error::output_sink("existing output has no header row", Some(e)))?;
        let code_col = headers.iter().position(|h| h == "station_code");
        let year_col = headers.iter().position(|h| h == "year");
        let (Some(code_col), Some(year_col)) = (code_col, year_col) else {
            return Err(Error::output_sink(
                format!(
                    "existing output {} lacks station_code/year columns",
                    path.display()
                ),
                None,
            ));
        };

        let mut claimed = HashSet::new();
        for row in reader.records() {
            let Ok(row) = row else { continue };
            let (Some(code), Some(year)) = (row.get(code_col), row.get(year_col)) else {
                continue;
            };
            if let Ok(year) = year.parse::<u16>() {
                claimed.insert(RecordKey::new(code, year));
            }
        }

        info!(keys = claimed.len(), file = %path.display(), "resuming past existing records");
        Ok(Self {
            claimed: Mutex::new(claimed),
        })
    }

    /// Atomically claim a key. Returns `true` if this caller is the first,
    /// `false` if the station-year was already claimed.
    pub fn claim(&self, key: RecordKey) -> bool {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let fresh = claimed.insert(key.clone());
        if !fresh {
            debug!(key = %key, "duplicate station-year skipped");
        }
        fresh
    }

    /// Whether a key has been claimed, without claiming it
    pub fn seen(&self, key: &RecordKey) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key)
    }

    /// Number of claimed keys
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
