//! DSI Streamflow Yearbook Extractor Library
//!
//! A Rust library for extracting normalized station-year flow records from
//! DSI (Turkish State Hydraulic Works) annual streamflow yearbooks that have
//! been dumped to plain text.
//!
//! This library provides tools for:
//! - Classifying yearbook pages cheaply without scanning full page bodies
//! - Locating station header blocks, twelve-month flow tables, and
//!   annual-summary footers by content-defined anchors
//! - Normalizing mixed Turkish/English numeric notation into canonical floats
//! - Deduplicating station-year records across documents and repeated runs
//! - Writing ordered CSV output with a secondary review sink for partials
//! - Comprehensive error handling and recovery

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_sink;
        pub mod dedup_index;
        pub mod footer_extractor;
        pub mod header_extractor;
        pub mod monthly_table;
        pub mod normalizer;
        pub mod orchestrator;
        pub mod page_classifier;
        pub mod scan;
        pub mod station_matcher;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AnnualSummary, MonthlyFlowEntry, RecordKey, StationRecord};
pub use config::Config;

/// Result type alias for the DSI extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for yearbook extraction operations
///
/// Only `Configuration` errors are fatal to a run. Page-level problems
/// (undecodable pages, missing anchors, column mismatches, duplicate keys)
/// are recovered locally by the orchestrator and surface as run statistics,
/// never as `Err` values.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error - the only fatal class, surfaced before any
    /// page processing begins
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Page text could not be decoded into lines
    #[error("Page decode error in '{document}' page {page}: {message}")]
    PageDecode {
        document: String,
        page: usize,
        message: String,
    },

    /// CSV output sink error
    #[error("Output sink error: {message}")]
    OutputSink {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Input document discovery error
    #[error("Input discovery error: {message}")]
    InputDiscovery {
        message: String,
        #[source]
        source: Option<walkdir::Error>,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a page decode error
    pub fn page_decode(
        document: impl Into<String>,
        page: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::PageDecode {
            document: document.into(),
            page,
            message: message.into(),
        }
    }

    /// Create an output sink error with context
    pub fn output_sink(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::OutputSink {
            message: message.into(),
            source,
        }
    }

    /// Create an input discovery error
    pub fn input_discovery(message: impl Into<String>, source: Option<walkdir::Error>) -> Self {
        Self::InputDiscovery {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::OutputSink {
            message: "CSV write failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::InputDiscovery {
            message: "Directory traversal failed".to_string(),
            source: Some(error),
        }
    }
}
