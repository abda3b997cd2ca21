//! Pipeline orchestration
//!
//! Drives one page through classify, extract, finalize. The orchestrator
//! owns the shared extraction services and the output sinks; documents and
//! pages flow through it from whichever worker picked them up. All page
//! problems degrade to statistics; the only errors that escape are sink
//! failures and cancellation.

use crate::app::adapters::filesystem::{Document, Page};
use crate::app::models::{RecordKey, StationRecord};
use crate::app::services::csv_sink::CsvSink;
use crate::app::services::dedup_index::DedupIndex;
use crate::app::services::footer_extractor::FooterExtractor;
use crate::app::services::header_extractor::HeaderExtractor;
use crate::app::services::monthly_table::{RowKind, extract_monthly_table};
use crate::app::services::page_classifier::{PageClass, PageClassifier};
use crate::app::services::station_matcher::StationMatcher;
use crate::config::Config;
use crate::{Error, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::stats::RunStats;

/// What happened to one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Not a station page
    Skipped,
    /// Station code outside the target set
    Foreign,
    /// Complete record written to the primary output
    Finalized(RecordKey),
    /// Station-year already claimed, record dropped
    Duplicate(RecordKey),
    /// Incomplete record routed to the review sink
    Partial(RecordKey),
}

/// Extraction pipeline over shared services and sinks
pub struct Orchestrator {
    matcher: Arc<StationMatcher>,
    classifier: PageClassifier,
    headers: HeaderExtractor,
    footers: FooterExtractor,
    dedup: Arc<DedupIndex>,
    sink: Arc<CsvSink>,
    review_sink: Option<Arc<CsvSink>>,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Build the pipeline from a validated configuration, opening the
    /// output sinks and preloading the dedup index when resuming
    pub fn new(config: &Config, cancel: CancellationToken) -> Result<Self> {
        let matcher = Arc::new(StationMatcher::new(&config.target_stations));

        let (dedup, sink) = if config.resume {
            let dedup = DedupIndex::preload_from_csv(&config.output_file)?;
            (Arc::new(dedup), Arc::new(CsvSink::append(&config.output_file)?))
        } else {
            (
                Arc::new(DedupIndex::new()),
                Arc::new(CsvSink::create(&config.output_file)?),
            )
        };

        let review_sink = match &config.review_file {
            Some(path) => Some(Arc::new(CsvSink::create_review(path)?)),
            None => None,
        };

        Ok(Self {
            classifier: PageClassifier::new(Arc::clone(&matcher)),
            matcher,
            headers: HeaderExtractor::new(),
            footers: FooterExtractor::new(),
            dedup,
            sink,
            review_sink,
            cancel,
        })
    }

    /// Process every page of one document, returning its stats block.
    ///
    /// Stops early with [`Error::ProcessingInterrupted`] when cancellation
    /// is requested; rows already written stay written.
    pub fn process_document(&self, document: &Document) -> Result<RunStats> {
        let mut stats = RunStats::new();
        stats.page_errors = document.decode_failures.len();
        stats.pages_scanned = document.decode_failures.len();

        for page in &document.pages {
            if self.cancel.is_cancelled() {
                return Err(Error::processing_interrupted(format!(
                    "cancelled while processing {}",
                    document.name
                )));
            }
            stats.pages_scanned += 1;
            self.process_page(&document.name, document.year_hint, page, &mut stats)?;
        }

        debug!(document = %document.name, "{}", stats.summary());
        Ok(stats)
    }

    /// Run one page through the pipeline
    pub fn process_page(
        &self,
        document: &str,
        year_hint: Option<u16>,
        page: &Page,
        stats: &mut RunStats,
    ) -> Result<PageOutcome> {
        let (line_index, code) = match self.classifier.classify(&page.lines) {
            PageClass::NotStationPage => return Ok(PageOutcome::Skipped),
            PageClass::ForeignStation { .. } => {
                stats.foreign_stations += 1;
                return Ok(PageOutcome::Foreign);
            }
            PageClass::Candidate { line_index, code } => (line_index, code),
        };
        stats.candidates += 1;

        let (record, missing) = self.extract_record(document, year_hint, page, line_index, &code);
        let key = record.key();

        if record.is_complete() {
            if self.dedup.claim(key.clone()) {
                self.sink.write(&record, &[])?;
                stats.finalized += 1;
                info!(key = %key, document, page = page.number, "record written");
                Ok(PageOutcome::Finalized(key))
            } else {
                stats.duplicates_skipped += 1;
                Ok(PageOutcome::Duplicate(key))
            }
        } else {
            // Partial records never claim the key: a later, complete page
            // for the same station-year must still be able to win
            stats.partials += 1;
            warn!(
                key = %key,
                document,
                page = page.number,
                missing = missing.join(";"),
                "partial record"
            );
            if let Some(review) = &self.review_sink {
                let missing_refs: Vec<&str> = missing.iter().map(String::as_str).collect();
                review.write(&record, &missing_refs)?;
            }
            Ok(PageOutcome::Partial(key))
        }
    }

    fn extract_record(
        &self,
        document: &str,
        year_hint: Option<u16>,
        page: &Page,
        line_index: usize,
        code: &str,
    ) -> (StationRecord, Vec<String>) {
        let lines = &page.lines;
        let code_end = self
            .matcher
            .find_code(&lines[line_index])
            .map(|m| m.end)
            .unwrap_or(0);

        let header = self.headers.extract(lines, line_index, code_end);
        let table = extract_monthly_table(lines, line_index);
        let footer = self.footers.extract(lines, table.end_index);

        // The footer's printed water year wins over the file-name hint
        let year = footer.water_year.or(year_hint).unwrap_or(0);

        let mut missing: Vec<String> = header.missing.iter().map(|s| s.to_string()).collect();
        missing.extend(footer.missing.iter().map(|s| s.to_string()));
        for kind in RowKind::ALL {
            if !table.rows_found.contains(&kind) {
                missing.push(format!("{}_row", kind.name()));
            }
        }
        if year == 0 {
            missing.push("year".to_string());
        }

        let mut record = StationRecord::new(document, page.number, year, code, header.station_name);
        record.region_name = header.region_name;
        record.coordinates_raw = header.coordinates_raw;
        record.coordinates = header.coordinates;
        record.catchment_area_km2 = header.catchment_area_km2;
        record.estimated_elevation_m = header.estimated_elevation_m;
        record.observation_period = header.observation_period;
        record.annual_avg_flow_m3s = header.annual_avg_flow_m3s;
        record.monthly = table.entries;
        record.annual_summary.annual_total_m3 = footer.annual_total_m3;
        record.annual_summary.mm_total = footer.mm_total;
        record.annual_summary.avg_specific_discharge = footer.avg_specific_discharge;

        (record, missing)
    }

    /// The shared dedup index
    pub fn dedup(&self) -> &DedupIndex {
        &self.dedup
    }

    /// Flush both sinks
    pub fn flush(&self) -> Result<()> {
        self.sink.flush()?;
        if let Some(review) = &self.review_sink {
            review.flush()?;
        }
        Ok(())
    }

    /// Primary output path
    pub fn output_path(&self) -> &std::path::Path {
        self.sink.path()
    }
}
