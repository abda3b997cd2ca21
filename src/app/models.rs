//! Data models for yearbook extraction
//!
//! This module contains the core data structures for representing station-year
//! flow records extracted from DSI annual streamflow yearbooks: the monthly
//! flow table, the annual summary footer, and the finalized station record.

use crate::constants::{MONTH_COLUMN_COUNT, MONTH_SHORT_NAMES};
use serde::{Deserialize, Serialize};

// =============================================================================
// Hydrological Month Calendar
// =============================================================================

/// Months of the DSI hydrological year, in report column order.
///
/// The water year runs October through September; the yearbook tables print
/// their twelve columns in this order, not calendar order. The ordering here
/// is a fixed table and must never be re-derived from calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Month {
    October,
    November,
    December,
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
}

impl Month {
    /// All months in hydrological-year column order
    pub const ALL: [Month; MONTH_COLUMN_COUNT] = [
        Month::October,
        Month::November,
        Month::December,
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
    ];

    /// Zero-based column index of this month in the flow table
    pub fn column_index(self) -> usize {
        Month::ALL
            .iter()
            .position(|m| *m == self)
            .unwrap_or_default()
    }

    /// Short lowercase name used in output column headers
    pub fn short_name(self) -> &'static str {
        MONTH_SHORT_NAMES[self.column_index()]
    }
}

// =============================================================================
// Coordinates
// =============================================================================

/// Best-effort parsed station coordinates in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

// =============================================================================
// Monthly Flow Entry
// =============================================================================

/// One month column of the six-row flow table.
///
/// All numeric fields are nullable: a missing row kind on a page nulls that
/// field for all twelve months without invalidating the other row kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlowEntry {
    /// Month this entry belongs to, in hydrological-year order
    pub month: Month,

    /// Maximum instantaneous discharge (m³/s)
    pub max_flow_m3s: Option<f64>,

    /// Minimum instantaneous discharge (m³/s)
    pub min_flow_m3s: Option<f64>,

    /// Mean discharge (m³/s)
    pub avg_flow_m3s: Option<f64>,

    /// Specific discharge per unit catchment area (lt/s/km²)
    pub specific_discharge: Option<f64>,

    /// Runoff depth (mm)
    pub depth_mm: Option<f64>,

    /// Flow volume (million m³)
    pub volume_million_m3: Option<f64>,
}

impl MonthlyFlowEntry {
    /// Create an empty entry for a month with all metrics null
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            max_flow_m3s: None,
            min_flow_m3s: None,
            avg_flow_m3s: None,
            specific_discharge: None,
            depth_mm: None,
            volume_million_m3: None,
        }
    }

    /// True when every metric resolved for this month
    pub fn is_fully_populated(&self) -> bool {
        self.max_flow_m3s.is_some()
            && self.min_flow_m3s.is_some()
            && self.avg_flow_m3s.is_some()
            && self.specific_discharge.is_some()
            && self.depth_mm.is_some()
            && self.volume_million_m3.is_some()
    }
}

// =============================================================================
// Annual Summary
// =============================================================================

/// Annual totals from the summary footer below the flow table.
///
/// Values are carried through verbatim as printed in the report;
/// `annual_total_m3` stays in the report's million-m³ unit and is never
/// rescaled or recomputed from the monthly volumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualSummary {
    /// Annual total flow volume (million m³, verbatim)
    pub annual_total_m3: Option<f64>,

    /// Annual runoff depth total (mm)
    pub mm_total: Option<f64>,

    /// Annual average specific discharge (lt/s/km²)
    pub avg_specific_discharge: Option<f64>,
}

impl AnnualSummary {
    /// True when all three annual values resolved
    pub fn is_fully_populated(&self) -> bool {
        self.annual_total_m3.is_some()
            && self.mm_total.is_some()
            && self.avg_specific_discharge.is_some()
    }
}

// =============================================================================
// Deduplication Key
// =============================================================================

/// Unique identity of one station-year observation period
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Uppercased station code (e.g. "D22A093")
    pub station_code: String,

    /// Water year
    pub year: u16,
}

impl RecordKey {
    /// Create a key with case-normalized station code
    pub fn new(station_code: &str, year: u16) -> Self {
        Self {
            station_code: station_code.trim().to_uppercase(),
            year,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.station_code, self.year)
    }
}

// =============================================================================
// Station Record
// =============================================================================

/// One normalized station-year record extracted from a yearbook page.
///
/// A record is constructed incrementally while scanning one page, finalized
/// exactly once, and immutable after finalization. It is *complete* only if
/// the station code and year are present and the monthly-average row resolved
/// for all twelve months; otherwise it is a partial record, surfaced to the
/// review sink rather than persisted as primary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Source document identifier (yearbook file name)
    pub document: String,

    /// One-based page ordinal within the document
    pub page: usize,

    /// Water year
    pub year: u16,

    /// Uppercased station code
    pub station_code: String,

    /// Station name, remainder of the code line
    pub station_name: String,

    /// Basin heading from the top of the page
    pub region_name: Option<String>,

    /// Coordinates exactly as printed
    pub coordinates_raw: Option<String>,

    /// Best-effort parsed coordinates; null when parsing failed
    pub coordinates: Option<Coordinates>,

    /// Precipitation/catchment area (km²). `Some(0.0)` means the anchor was
    /// found with a zero value; `None` means the anchor was not found.
    pub catchment_area_km2: Option<f64>,

    /// Approximate gauge elevation (m)
    pub estimated_elevation_m: Option<f64>,

    /// Observation period exactly as printed
    pub observation_period: Option<String>,

    /// Mean flow in the water year (m³/s)
    pub annual_avg_flow_m3s: Option<f64>,

    /// Twelve monthly entries in hydrological-year order
    pub monthly: Vec<MonthlyFlowEntry>,

    /// Annual summary footer values
    pub annual_summary: AnnualSummary,
}

impl StationRecord {
    /// Create a record seeded with empty monthly entries
    pub fn new(
        document: impl Into<String>,
        page: usize,
        year: u16,
        station_code: &str,
        station_name: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            page,
            year,
            station_code: station_code.trim().to_uppercase(),
            station_name: station_name.into(),
            region_name: None,
            coordinates_raw: None,
            coordinates: None,
            catchment_area_km2: None,
            estimated_elevation_m: None,
            observation_period: None,
            annual_avg_flow_m3s: None,
            monthly: Month::ALL.iter().map(|m| MonthlyFlowEntry::empty(*m)).collect(),
            annual_summary: AnnualSummary::default(),
        }
    }

    /// Deduplication key for this record
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.station_code, self.year)
    }

    /// Completeness rule: station code and year present, and the
    /// monthly-average row resolved for all twelve months
    pub fn is_complete(&self) -> bool {
        !self.station_code.is_empty()
            && self.year > 0
            && self.monthly.len() == MONTH_COLUMN_COUNT
            && self.monthly.iter().all(|e| e.avg_flow_m3s.is_some())
    }

    /// Number of months whose average flow is missing
    pub fn missing_average_months(&self) -> usize {
        self.monthly
            .iter()
            .filter(|e| e.avg_flow_m3s.is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_calendar_starts_in_october() {
        assert_eq!(Month::ALL[0], Month::October);
        assert_eq!(Month::ALL[11], Month::September);
        assert_eq!(Month::January.column_index(), 3);
        assert_eq!(Month::October.short_name(), "oct");
        assert_eq!(Month::September.short_name(), "sep");
    }

    #[test]
    fn record_key_normalizes_case() {
        assert_eq!(RecordKey::new(" d22a093 ", 2015), RecordKey::new("D22A093", 2015));
    }

    #[test]
    fn new_record_is_partial_until_averages_resolve() {
        let mut record = StationRecord::new("dsi_2015.txt", 12, 2015, "D22A093", "TURNASUYU");
        assert!(!record.is_complete());
        assert_eq!(record.missing_average_months(), 12);

        for entry in &mut record.monthly {
            entry.avg_flow_m3s = Some(1.0);
        }
        assert!(record.is_complete());
        assert_eq!(record.missing_average_months(), 0);
    }

    #[test]
    fn completeness_ignores_other_row_kinds() {
        let mut record = StationRecord::new("dsi_2015.txt", 12, 2015, "D22A093", "TURNASUYU");
        for entry in &mut record.monthly {
            entry.avg_flow_m3s = Some(1.0);
        }
        // Max/min/volume all missing, record still complete
        assert!(record.is_complete());
        assert!(!record.monthly[0].is_fully_populated());
    }
}
