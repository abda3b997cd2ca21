//! Run statistics for the extraction pipeline
//!
//! Page-level problems never surface as errors; they land here as counters
//! and are reported once at the end of the run.

/// Statistics for one extraction run (or one document, before merging)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Total pages inspected by the classifier
    pub pages_scanned: usize,
    /// Pages classified as target-station candidates
    pub candidates: usize,
    /// Complete records written to the primary output
    pub finalized: usize,
    /// Candidates dropped because their station-year was already claimed
    pub duplicates_skipped: usize,
    /// Partial records routed to the review sink (or dropped when no
    /// review sink is configured)
    pub partials: usize,
    /// Pages carrying a station code outside the target set
    pub foreign_stations: usize,
    /// Pages that failed structural decoding
    pub page_errors: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another stats block into this one
    pub fn merge(&mut self, other: &RunStats) {
        self.pages_scanned += other.pages_scanned;
        self.candidates += other.candidates;
        self.finalized += other.finalized;
        self.duplicates_skipped += other.duplicates_skipped;
        self.partials += other.partials;
        self.foreign_stations += other.foreign_stations;
        self.page_errors += other.page_errors;
    }

    /// Share of candidates that finalized as complete records
    pub fn completion_rate(&self) -> f64 {
        if self.candidates == 0 {
            100.0
        } else {
            (self.finalized as f64 / self.candidates as f64) * 100.0
        }
    }

    /// One-line human summary for the end of the run
    pub fn summary(&self) -> String {
        format!(
            "Scanned {} pages | {} candidates | {} records written ({:.1}% complete) | \
             {} duplicates skipped | {} partial | {} foreign | {} page errors",
            self.pages_scanned,
            self.candidates,
            self.finalized,
            self.completion_rate(),
            self.duplicates_skipped,
            self.partials,
            self.foreign_stations,
            self.page_errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_accumulates_every_counter() {
        let mut total = RunStats::new();
        total.merge(&RunStats {
            pages_scanned: 100,
            candidates: 5,
            finalized: 4,
            duplicates_skipped: 1,
            partials: 0,
            foreign_stations: 20,
            page_errors: 2,
        });
        total.merge(&RunStats {
            pages_scanned: 50,
            candidates: 2,
            finalized: 1,
            duplicates_skipped: 0,
            partials: 1,
            foreign_stations: 3,
            page_errors: 0,
        });

        assert_eq!(total.pages_scanned, 150);
        assert_eq!(total.candidates, 7);
        assert_eq!(total.finalized, 5);
        assert_eq!(total.duplicates_skipped, 1);
        assert_eq!(total.partials, 1);
        assert_eq!(total.foreign_stations, 23);
        assert_eq!(total.page_errors, 2);
    }

    #[test]
    fn completion_rate_handles_empty_runs() {
        assert_eq!(RunStats::new().completion_rate(), 100.0);

        let stats = RunStats {
            candidates: 4,
            finalized: 3,
            ..RunStats::default()
        };
        assert_eq!(stats.completion_rate(), 75.0);
    }

    #[test]
    fn summary_mentions_the_record_count() {
        let stats = RunStats {
            pages_scanned: 10,
            candidates: 2,
            finalized: 2,
            ..RunStats::default()
        };
        assert!(stats.summary().contains("2 records written"));
    }
}
