//! Annual-summary footer extraction
//!
//! Below the monthly table a separator rule precedes the annual summary:
//! "SU YILI (2020) YILLIK TOPLAM AKIM 149.05 MİLYON M3 710 MM. 22.4
//! LT/SN/Km2". The extractor scans forward from the end of the table for the
//! separator run, then reads the three anchor-labeled values from the lines
//! immediately following. Some report years drop the labels and print a bare
//! numeric line; that falls back to positional assignment.
//!
//! Same null-on-miss policy as the header: nothing here ever fails a page.

use super::normalizer::{self, fold_upper, row_values};
use super::scan::is_separator_line;
use crate::constants::{FOOTER_SCAN_WINDOW, FOOTER_VALUE_WINDOW, anchors};
use regex::Regex;
use tracing::debug;

/// Best-effort annual summary values plus the water year printed in the
/// footer, which takes precedence over the year inferred from the document
/// name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FooterFields {
    pub annual_total_m3: Option<f64>,
    pub mm_total: Option<f64>,
    pub avg_specific_discharge: Option<f64>,
    pub water_year: Option<u16>,

    /// Names of values whose anchor or pattern was not found
    pub missing: Vec<&'static str>,
}

/// Extracts the annual summary below the flow table
#[derive(Debug)]
pub struct FooterExtractor {
    water_year: Regex,
    annual_total: Regex,
    mm_total: Regex,
    specific: Regex,
}

impl Default for FooterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FooterExtractor {
    pub fn new() -> Self {
        // Patterns run against Turkish-folded, uppercased line text
        Self {
            water_year: Regex::new(r"SU\s*YILI\s*\((\d{4})\)")
                .expect("water year pattern is valid"),
            annual_total: Regex::new(
                r"(?:YILLIK\s*TOPLAM\s*AKIM|ANNUAL\s*TOTAL\s*FLOW)\s*:?\s*([0-9.,]+)",
            )
            .expect("annual total pattern is valid"),
            mm_total: Regex::new(r"([0-9.,]+)\s*MM\b").expect("mm total pattern is valid"),
            specific: Regex::new(r"([0-9.,]+)\s*LT\s*/?\s*SN").expect("specific pattern is valid"),
        }
    }

    /// Extract the annual summary, scanning forward from `table_end` for the
    /// separator marker within a bounded window
    pub fn extract(&self, lines: &[String], table_end: usize) -> FooterFields {
        let mut fields = FooterFields::default();

        let separator_end = table_end.saturating_add(FOOTER_SCAN_WINDOW).min(lines.len());
        let Some(separator) = lines[table_end.min(lines.len())..separator_end]
            .iter()
            .position(|line| is_separator_line(line))
            .map(|offset| table_end + offset)
        else {
            debug!("no footer separator within window");
            fields.missing = vec!["annual_total_m3", "mm_total", "avg_specific_discharge"];
            return fields;
        };

        let value_end = separator.saturating_add(1 + FOOTER_VALUE_WINDOW).min(lines.len());
        let value_lines = &lines[separator + 1..value_end];

        if let Some(folded) = value_lines
            .iter()
            .map(|line| fold_upper(line))
            .find(|folded| anchors::ANNUAL_TOTAL.iter().any(|a| folded.contains(a)))
        {
            self.extract_labeled(&folded, &mut fields);
        } else if let Some(values) = value_lines
            .iter()
            .map(|line| row_values(&fold_upper(line)))
            .find(|values| values.len() >= 3)
        {
            // Label-free variant: annual total, depth, specific discharge
            // in print order
            fields.annual_total_m3 = Some(values[0]);
            fields.mm_total = Some(values[1]);
            fields.avg_specific_discharge = Some(values[2]);
        }

        if fields.annual_total_m3.is_none() {
            fields.missing.push("annual_total_m3");
        }
        if fields.mm_total.is_none() {
            fields.missing.push("mm_total");
        }
        if fields.avg_specific_discharge.is_none() {
            fields.missing.push("avg_specific_discharge");
        }

        fields
    }

    fn extract_labeled(&self, folded: &str, fields: &mut FooterFields) {
        fields.water_year = self
            .water_year
            .captures(folded)
            .and_then(|caps| caps[1].parse().ok());
        fields.annual_total_m3 = self
            .annual_total
            .captures(folded)
            .and_then(|caps| normalizer::parse_number(&caps[1]));
        fields.mm_total = self
            .mm_total
            .captures(folded)
            .and_then(|caps| normalizer::parse_number(&caps[1]));
        fields.avg_specific_discharge = self
            .specific
            .captures(folded)
            .and_then(|caps| normalizer::parse_number(&caps[1]));
    }
}
