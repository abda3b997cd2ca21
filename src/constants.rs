//! Application constants for the DSI yearbook extractor
//!
//! This module contains the anchor-phrase tables, scan-window bounds,
//! and default values used throughout the extractor. Anchor phrases are
//! stored in their Turkish-folded, uppercased form; matching code folds
//! page text the same way before comparison, so language and diacritic
//! variants are data changes here rather than code changes.

// =============================================================================
// Station Code Grammar
// =============================================================================

/// Station code grammar used by DSI yearbooks: a letter, two digits, a
/// letter, three digits (e.g. "D22A093", "E14A027")
pub const STATION_CODE_PATTERN: &str = r"(?i)[A-Z]\d{2}[A-Z]\d{3}";

/// Default target stations (the 37 Yeşilırmak / Eastern Black Sea gauges)
pub const DEFAULT_TARGET_STATIONS: &[&str] = &[
    "E22A065", "E22A066", "D22A093", "E22A071", "D14A185", "E22A054", "E22A063", "E14A018",
    "D14A162", "D14A186", "D22A105", "E22A053", "D14A172", "D14A117", "E14A027", "D22A106",
    "D14A200", "E14A002", "D14A179", "D22A098", "D22A159", "D14A064", "E14A038", "D14A201",
    "D14A184", "D14A211", "D14A208", "D14A214", "D14A207", "D14A141", "E22A062", "E14A040",
    "D14A215", "D14A176", "D14A011", "D14A188", "D14A081",
];

// =============================================================================
// Page Layout Bounds
// =============================================================================

/// Number of leading page lines the classifier may inspect. The station
/// code conventionally sits on the second non-empty line (after the basin
/// heading), so rejection cost is independent of page length.
pub const CLASSIFIER_PREFIX_LINES: usize = 4;

/// Fixed relative offset from the station-code line to the coordinates
/// line (code line, two intervening metadata lines, then coordinates)
pub const COORDINATE_LINE_OFFSET: usize = 3;

/// Forward scan window for header anchors below the station-code line
pub const HEADER_SCAN_WINDOW: usize = 15;

/// Forward scan window for the catchment-area anchor
pub const CATCHMENT_SCAN_WINDOW: usize = 10;

/// Forward scan window for locating the monthly flow table anchor
pub const TABLE_SCAN_WINDOW: usize = 60;

/// Lines a wrapped table row may spill onto before the count check
pub const ROW_CONTINUATION_LINES: usize = 3;

/// Forward scan window for the footer separator below the table
pub const FOOTER_SCAN_WINDOW: usize = 20;

/// Lines inspected after the separator for annual-summary values
pub const FOOTER_VALUE_WINDOW: usize = 6;

/// Minimum run length of a repeated separator character ('=' or '-')
pub const SEPARATOR_MIN_RUN: usize = 4;

/// Number of month columns in every flow-table row
pub const MONTH_COLUMN_COUNT: usize = 12;

// =============================================================================
// Anchor Phrase Tables
// =============================================================================

/// Header and footer anchor phrases (Turkish-folded, uppercased).
/// Each entry lists every recognized variant of one anchor.
pub mod anchors {
    /// "YAĞIŞ ALANI : 1500 km2" - precipitation/catchment area
    pub const CATCHMENT_AREA: &[&str] = &["YAGIS ALANI", "DRAINAGE AREA"];

    /// "YAKLAŞIK KOT : 404 m" - approximate gauge elevation
    pub const ELEVATION: &[&str] = &["YAKLASIK KOT", "APPROX. ELEVATION"];

    /// "GÖZLEM SÜRESİ : 06.11.1990 - 30.09.2020" - observation period
    pub const OBSERVATION_PERIOD: &[&str] = &["GOZLEM SURESI", "OBSERVATION PERIOD"];

    /// "... 2020 Su yılında 4.711 m3/sn" - mean flow in the water year
    pub const WATER_YEAR_FLOW: &[&str] = &["SU YILINDA", "IN THE WATER YEAR"];

    /// "SU YILI (2020) YILLIK TOPLAM AKIM ..." - annual summary line
    pub const ANNUAL_TOTAL: &[&str] = &["YILLIK TOPLAM AKIM", "ANNUAL TOTAL FLOW"];
}

/// Row-label anchor phrases for the six monthly-table row kinds
/// (Turkish-folded, uppercased; matched at line start)
pub mod row_labels {
    /// Monthly maximum instantaneous discharge
    pub const MAX: &[&str] = &["MAKS", "MAXIMUM"];

    /// Monthly minimum instantaneous discharge
    pub const MIN: &[&str] = &["MIN.", "MIN ", "MINIMUM"];

    /// Monthly mean discharge
    pub const AVERAGE: &[&str] = &["ORTALAMA", "AVERAGE", "MEAN"];

    /// Specific discharge per unit catchment area
    pub const SPECIFIC_DISCHARGE: &[&str] = &["LT/SN/KM2", "L/S/KM2"];

    /// Runoff depth in millimeters
    pub const DEPTH_MM: &[&str] = &["AKIM MM", "RUNOFF MM"];

    /// Monthly volume in million cubic meters
    pub const VOLUME: &[&str] = &["MIL. M3", "MIL M3", "MILLION M3"];
}

// =============================================================================
// Token Normalization
// =============================================================================

/// Tokens the reports print for dry months; carried through as the value 0
pub const DRY_TOKENS: &[&str] = &["KURU", "DRY"];

// =============================================================================
// Month Calendar and Output Schema
// =============================================================================

/// Short month names in hydrological-year order (the DSI water year runs
/// October through September). This is a fixed table, never derived from
/// calendar-year ordering.
pub const MONTH_SHORT_NAMES: &[&str] = &[
    "oct", "nov", "dec", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep",
];

/// Output column suffixes for the six monthly metrics, in schema order
pub const METRIC_SUFFIXES: &[&str] = &[
    "max_flow_m3s",
    "min_flow_m3s",
    "avg_flow_m3s",
    "lt_sn_km2",
    "mm",
    "mil_m3",
];

// =============================================================================
// Processing Defaults
// =============================================================================

/// Page delimiter in extracted-text yearbook dumps (form feed)
pub const PAGE_DELIMITER: u8 = 0x0C;

/// Input document file extension
pub const DOCUMENT_EXTENSION: &str = "txt";

/// Default primary output filename
pub const DEFAULT_OUTPUT_FILENAME: &str = "dsi_flow_data.csv";
