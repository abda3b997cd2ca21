//! Station header block extraction
//!
//! Given a candidate page and the line index of the station code, pulls the
//! station name, basin heading, coordinates, catchment area, gauge elevation,
//! observation period, and the water-year mean flow. Fields sit either at
//! fixed nearby offsets (coordinates) or behind labeled anchors inside a
//! bounded forward window.
//!
//! Extraction never fails: any field that cannot be located is left null and
//! reported in the missing-field list for the orchestrator to log.

use super::normalizer::{self, fold_upper};
use super::scan::find_anchor;
use crate::app::models::Coordinates;
use crate::constants::{CATCHMENT_SCAN_WINDOW, COORDINATE_LINE_OFFSET, HEADER_SCAN_WINDOW, anchors};
use regex::Regex;
use tracing::debug;

/// Best-effort header fields with a list of what could not be located
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFields {
    pub station_name: String,
    pub region_name: Option<String>,
    pub coordinates_raw: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub catchment_area_km2: Option<f64>,
    pub estimated_elevation_m: Option<f64>,
    pub observation_period: Option<String>,
    pub annual_avg_flow_m3s: Option<f64>,

    /// Names of fields whose anchor or pattern was not found
    pub missing: Vec<&'static str>,
}

/// Extracts header fields from candidate pages
#[derive(Debug)]
pub struct HeaderExtractor {
    coord_dms: Regex,
    coord_decimal: Regex,
    catchment: Regex,
    elevation: Regex,
    period_range: Regex,
    water_year_flow: Regex,
}

impl Default for HeaderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderExtractor {
    pub fn new() -> Self {
        // All patterns run against Turkish-folded, uppercased line text.
        // Yearbooks print longitude first ("Doğu"), then latitude ("Kuzey").
        Self {
            coord_dms: Regex::new(
                r#"(\d{1,3})°\s*(\d{1,2})'\s*(\d{1,2}(?:\.\d+)?)"?\s*(DOGU|EAST|BATI|WEST|[DEBW])\s*-\s*(\d{1,3})°\s*(\d{1,2})'\s*(\d{1,2}(?:\.\d+)?)"?\s*(KUZEY|NORTH|GUNEY|SOUTH|[KNGS])"#,
            )
            .expect("DMS coordinate pattern is valid"),
            coord_decimal: Regex::new(
                r"([-+]?\d{1,3}\.\d+)°?\s*(DOGU|EAST|BATI|WEST)?\s*[-,;]\s*([-+]?\d{1,3}\.\d+)°?\s*(KUZEY|NORTH|GUNEY|SOUTH)?",
            )
            .expect("decimal coordinate pattern is valid"),
            catchment: Regex::new(r"(?:YAGIS\s*ALANI|DRAINAGE\s*AREA)\s*:?\s*([0-9.,]+)")
                .expect("catchment pattern is valid"),
            elevation: Regex::new(r"(?:YAKLASIK\s*KOT|APPROX\.?\s*ELEVATION)\s*:?\s*([0-9.,]+)")
                .expect("elevation pattern is valid"),
            period_range: Regex::new(r"(\d{1,2}\.\d{1,2}\.\d{4}\s*-\s*\d{1,2}\.\d{1,2}\.\d{4})")
                .expect("period pattern is valid"),
            water_year_flow: Regex::new(
                r"(?:SU\s*YILINDA|IN\s*THE\s*WATER\s*YEAR)\s*:?\s*([0-9.,]+)\s*M3",
            )
            .expect("water-year flow pattern is valid"),
        }
    }

    /// Extract all header fields for a candidate page.
    ///
    /// `code_line` is the line index where the station code was found and
    /// `code_end` the byte offset just past the code token on that line.
    pub fn extract(&self, lines: &[String], code_line: usize, code_end: usize) -> HeaderFields {
        let mut missing = Vec::new();

        let station_name = lines
            .get(code_line)
            .map(|line| collapse_whitespace(&line[code_end.min(line.len())..]))
            .unwrap_or_default();
        if station_name.is_empty() {
            missing.push("station_name");
        }

        // Basin heading conventionally sits above the code line
        let region_name = if code_line > 0 {
            lines.first().map(|line| line.trim().to_string())
        } else {
            None
        };

        let (coordinates_raw, coordinates) = self.extract_coordinates(lines, code_line);
        if coordinates_raw.is_none() {
            missing.push("coordinates");
        }

        let (catchment_area_km2, estimated_elevation_m) =
            self.extract_catchment_and_elevation(lines, code_line);
        if catchment_area_km2.is_none() {
            missing.push("catchment_area_km2");
        }
        if estimated_elevation_m.is_none() {
            missing.push("estimated_elevation_m");
        }

        let observation_period = self.extract_observation_period(lines, code_line);
        if observation_period.is_none() {
            missing.push("observation_period");
        }

        let annual_avg_flow_m3s = self.extract_annual_avg_flow(lines, code_line);
        if annual_avg_flow_m3s.is_none() {
            missing.push("annual_avg_flow_m3s");
        }

        HeaderFields {
            station_name,
            region_name,
            coordinates_raw,
            coordinates,
            catchment_area_km2,
            estimated_elevation_m,
            observation_period,
            annual_avg_flow_m3s,
            missing,
        }
    }

    /// Coordinates sit at a fixed relative offset below the code line.
    /// The raw text is always kept; parsing is best-effort and a parse
    /// failure nulls only the parsed value.
    fn extract_coordinates(
        &self,
        lines: &[String],
        code_line: usize,
    ) -> (Option<String>, Option<Coordinates>) {
        let Some(line) = lines.get(code_line + COORDINATE_LINE_OFFSET) else {
            return (None, None);
        };
        let raw = line.trim();
        if raw.is_empty() {
            return (None, None);
        }

        let parsed = self.parse_coordinates(raw);
        if parsed.is_none() {
            debug!(raw, "coordinate text kept raw, parse failed");
        }
        (Some(raw.to_string()), parsed)
    }

    /// Parse DMS notation with Turkish or English hemisphere markers, or
    /// plain decimal-degree notation
    fn parse_coordinates(&self, raw: &str) -> Option<Coordinates> {
        let folded = fold_upper(raw);

        if let Some(caps) = self.coord_dms.captures(&folded) {
            let lon = dms_to_decimal(&caps[1], &caps[2], &caps[3])?;
            let lat = dms_to_decimal(&caps[5], &caps[6], &caps[7])?;
            let lon_sign = hemisphere_sign(&caps[4]);
            let lat_sign = hemisphere_sign(&caps[8]);
            return Some(Coordinates {
                latitude: lat * lat_sign,
                longitude: lon * lon_sign,
            });
        }

        if let Some(caps) = self.coord_decimal.captures(&folded) {
            let first: f64 = caps[1].parse().ok()?;
            let second: f64 = caps[3].parse().ok()?;
            // With hemisphere markers the first value is the longitude
            // (report order); without them assume latitude, longitude.
            return if caps.get(2).is_some() || caps.get(4).is_some() {
                let lon_sign = caps.get(2).map_or(1.0, |m| hemisphere_sign(m.as_str()));
                let lat_sign = caps.get(4).map_or(1.0, |m| hemisphere_sign(m.as_str()));
                Some(Coordinates {
                    latitude: second * lat_sign,
                    longitude: first * lon_sign,
                })
            } else {
                Some(Coordinates {
                    latitude: first,
                    longitude: second,
                })
            };
        }

        None
    }

    /// Catchment area and elevation usually share one anchor line:
    /// "YAĞIŞ ALANI : 210,00 km2 YAKLAŞIK KOT : 404 m"
    fn extract_catchment_and_elevation(
        &self,
        lines: &[String],
        code_line: usize,
    ) -> (Option<f64>, Option<f64>) {
        let Some(index) = find_anchor(
            lines,
            code_line,
            CATCHMENT_SCAN_WINDOW,
            anchors::CATCHMENT_AREA,
        ) else {
            return (None, None);
        };

        let folded = fold_upper(&lines[index]);
        let catchment = self
            .catchment
            .captures(&folded)
            .and_then(|caps| normalizer::parse_number(&caps[1]));

        // Elevation may sit on the same line or its own anchor line
        let elevation = self
            .elevation
            .captures(&folded)
            .and_then(|caps| normalizer::parse_number(&caps[1]))
            .or_else(|| {
                find_anchor(lines, code_line, HEADER_SCAN_WINDOW, anchors::ELEVATION).and_then(
                    |i| {
                        self.elevation
                            .captures(&fold_upper(&lines[i]))
                            .and_then(|caps| normalizer::parse_number(&caps[1]))
                    },
                )
            });

        (catchment, elevation)
    }

    /// "GÖZLEM SÜRESİ : 06.11.1990 - 30.09.2020", kept as raw text
    fn extract_observation_period(&self, lines: &[String], code_line: usize) -> Option<String> {
        let index = find_anchor(
            lines,
            code_line,
            HEADER_SCAN_WINDOW,
            anchors::OBSERVATION_PERIOD,
        )?;
        let line = &lines[index];

        if let Some(caps) = self.period_range.captures(line) {
            return Some(collapse_whitespace(&caps[1]));
        }
        // Fall back to everything after the label's colon
        line.split_once(':')
            .map(|(_, rest)| collapse_whitespace(rest))
            .filter(|s| !s.is_empty())
    }

    /// "... 2020 Su yılında 4.711 m3/sn." - mean flow in the water year
    fn extract_annual_avg_flow(&self, lines: &[String], code_line: usize) -> Option<f64> {
        let index = find_anchor(
            lines,
            code_line,
            HEADER_SCAN_WINDOW,
            anchors::WATER_YEAR_FLOW,
        )?;
        self.water_year_flow
            .captures(&fold_upper(&lines[index]))
            .and_then(|caps| normalizer::parse_number(&caps[1]))
    }
}

/// Convert degree/minute/second captures to decimal degrees
fn dms_to_decimal(deg: &str, min: &str, sec: &str) -> Option<f64> {
    let deg: f64 = deg.parse().ok()?;
    let min: f64 = min.parse().ok()?;
    let sec: f64 = sec.parse().ok()?;
    Some(deg + min / 60.0 + sec / 3600.0)
}

/// Sign for a folded hemisphere marker; west and south are negative
fn hemisphere_sign(marker: &str) -> f64 {
    match marker {
        "BATI" | "WEST" | "B" | "W" | "GUNEY" | "SOUTH" | "G" | "S" => -1.0,
        _ => 1.0,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
