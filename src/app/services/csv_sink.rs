//! Ordered CSV output
//!
//! Two sinks share one writer type: the primary sink receives finalized
//! complete records, the review sink receives partial records with an extra
//! `missing_fields` column so a human can triage what the extractors could
//! not resolve. Column order is fixed: the header group, then the six
//! monthly metrics grouped metric-major (all max columns, then all min
//! columns, and so on), then the annual summary.

use crate::app::models::StationRecord;
use crate::constants::{METRIC_SUFFIXES, MONTH_SHORT_NAMES};
use crate::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Thread-safe CSV writer for station-year records
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
    with_missing_column: bool,
}

impl CsvSink {
    /// Open the primary sink, writing the header row immediately
    pub fn create(path: &Path) -> Result<Self> {
        Self::open(path, false)
    }

    /// Open a review sink for partial records; appends a `missing_fields`
    /// column after the regular schema
    pub fn create_review(path: &Path) -> Result<Self> {
        Self::open(path, true)
    }

    /// Open the primary sink in append mode, for resumed runs where the
    /// header already exists
    pub fn append(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| Error::io(format!("cannot append to {}", path.display()), e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(csv::Writer::from_writer(file)),
            with_missing_column: false,
        })
    }

    fn open(path: &Path, with_missing_column: bool) -> Result<Self> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| {
            Error::output_sink(format!("cannot create {}", path.display()), Some(e))
        })?;
        writer.write_record(header_columns(with_missing_column))?;
        writer.flush()?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(writer),
            with_missing_column,
        })
    }

    /// Write one record as a CSV row and flush it.
    ///
    /// `missing_fields` is joined into the review column when this is a
    /// review sink; it is ignored on the primary sink.
    pub fn write(&self, record: &StationRecord, missing_fields: &[&str]) -> Result<()> {
        let mut row = record_columns(record);
        if self.with_missing_column {
            row.push(missing_fields.join(";"));
        }

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer.write_record(&row)?;
        writer.flush()?;
        Ok(())
    }

    /// Flush any buffered rows
    pub fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .flush()?;
        Ok(())
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Log where the output landed
    pub fn announce(&self, rows: usize) {
        info!(rows, file = %self.path.display(), "output written");
    }
}

/// Full output header in schema order
fn header_columns(with_missing_column: bool) -> Vec<String> {
    let mut columns: Vec<String> = [
        "file",
        "year",
        "station_code",
        "station_name",
        "region_name",
        "coordinates",
        "latitude",
        "longitude",
        "catchment_area_km2",
        "estimated_elevation_m",
        "observation_period",
        "annual_avg_flow_m3s",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    // Metric-major monthly columns: oct_max_flow_m3s .. sep_mil_m3
    for suffix in METRIC_SUFFIXES {
        for month in MONTH_SHORT_NAMES {
            columns.push(format!("{month}_{suffix}"));
        }
    }

    columns.push("annual_total_m3".to_string());
    columns.push("mm_total".to_string());
    columns.push("avg_specific_discharge".to_string());

    if with_missing_column {
        columns.push("missing_fields".to_string());
    }
    columns
}

fn record_columns(record: &StationRecord) -> Vec<String> {
    let mut row = vec![
        record.document.clone(),
        record.year.to_string(),
        record.station_code.clone(),
        record.station_name.clone(),
        record.region_name.clone().unwrap_or_default(),
        record.coordinates_raw.clone().unwrap_or_default(),
        opt_number(record.coordinates.map(|c| c.latitude)),
        opt_number(record.coordinates.map(|c| c.longitude)),
        opt_number(record.catchment_area_km2),
        opt_number(record.estimated_elevation_m),
        record.observation_period.clone().unwrap_or_default(),
        opt_number(record.annual_avg_flow_m3s),
    ];

    // Same metric-major order as the header
    let metrics: [fn(&crate::app::models::MonthlyFlowEntry) -> Option<f64>; 6] = [
        |e| e.max_flow_m3s,
        |e| e.min_flow_m3s,
        |e| e.avg_flow_m3s,
        |e| e.specific_discharge,
        |e| e.depth_mm,
        |e| e.volume_million_m3,
    ];
    for metric in metrics {
        for entry in &record.monthly {
            row.push(opt_number(metric(entry)));
        }
    }

    row.push(opt_number(record.annual_summary.annual_total_m3));
    row.push(opt_number(record.annual_summary.mm_total));
    row.push(opt_number(record.annual_summary.avg_specific_discharge));
    row
}

fn opt_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
