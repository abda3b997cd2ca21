//! Monthly flow table extraction
//!
//! The flow table prints six row kinds (max, min, average, specific
//! discharge, runoff depth, volume) across twelve month columns in
//! hydrological-year order. The table start is located by a content-defined
//! anchor (the maximum-flow row label) rather than a fixed line number, so
//! layout drift across report years does not break extraction.
//!
//! Row kinds are independent: a missing row nulls only its own metric.
//! A row that does not yield exactly twelve numeric tokens is nulled
//! entirely rather than assigned shifted - silent column misalignment is
//! worse than a visible hole.

use super::normalizer::{fold_upper, row_values};
use super::scan::{find_labeled_line, is_separator_line};
use crate::app::models::{Month, MonthlyFlowEntry};
use crate::constants::{MONTH_COLUMN_COUNT, ROW_CONTINUATION_LINES, TABLE_SCAN_WINDOW, row_labels};
use tracing::{debug, warn};

/// The six row kinds of the monthly flow table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Max,
    Min,
    Average,
    SpecificDischarge,
    DepthMm,
    Volume,
}

impl RowKind {
    /// All row kinds in report print order
    pub const ALL: [RowKind; 6] = [
        RowKind::Max,
        RowKind::Min,
        RowKind::Average,
        RowKind::SpecificDischarge,
        RowKind::DepthMm,
        RowKind::Volume,
    ];

    /// Recognized row-label variants (folded, uppercased), from the
    /// anchor-phrase tables
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            RowKind::Max => row_labels::MAX,
            RowKind::Min => row_labels::MIN,
            RowKind::Average => row_labels::AVERAGE,
            RowKind::SpecificDischarge => row_labels::SPECIFIC_DISCHARGE,
            RowKind::DepthMm => row_labels::DEPTH_MM,
            RowKind::Volume => row_labels::VOLUME,
        }
    }

    /// Stable name for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            RowKind::Max => "max",
            RowKind::Min => "min",
            RowKind::Average => "average",
            RowKind::SpecificDischarge => "specific_discharge",
            RowKind::DepthMm => "depth_mm",
            RowKind::Volume => "volume",
        }
    }
}

/// Result of extracting the monthly table from one page
#[derive(Debug, Clone, PartialEq)]
pub struct TableOutcome {
    /// Twelve monthly entries in hydrological-year order
    pub entries: Vec<MonthlyFlowEntry>,

    /// Row kinds that resolved with exactly twelve values
    pub rows_found: Vec<RowKind>,

    /// Row kinds nulled because they yielded the wrong token count
    pub column_mismatches: Vec<(RowKind, usize)>,

    /// Line index just past the last table row, where the footer scan starts
    pub end_index: usize,
}

impl TableOutcome {
    fn empty(end_index: usize) -> Self {
        Self {
            entries: Month::ALL.iter().map(|m| MonthlyFlowEntry::empty(*m)).collect(),
            rows_found: Vec::new(),
            column_mismatches: Vec::new(),
            end_index,
        }
    }
}

/// Locate and extract the monthly flow table, scanning forward from `start`
/// (the station-code line) within a bounded window.
pub fn extract_monthly_table(lines: &[String], start: usize) -> TableOutcome {
    // Content-defined anchor: the maximum-flow row opens the table
    let Some(anchor) = find_labeled_line(lines, start, TABLE_SCAN_WINDOW, RowKind::Max.labels())
    else {
        debug!("no flow table anchor within window");
        return TableOutcome::empty(start);
    };

    let mut outcome = TableOutcome::empty(anchor + 1);

    for kind in RowKind::ALL {
        let Some(row_index) = find_labeled_line(lines, anchor, TABLE_SCAN_WINDOW, kind.labels())
        else {
            debug!(row = kind.name(), "table row label not found");
            continue;
        };

        let (values, consumed_until) = collect_row_values(lines, row_index, kind);
        outcome.end_index = outcome.end_index.max(consumed_until);

        if values.len() == MONTH_COLUMN_COUNT {
            assign_row(&mut outcome.entries, kind, &values);
            outcome.rows_found.push(kind);
        } else {
            warn!(
                row = kind.name(),
                tokens = values.len(),
                "column count mismatch, row kind nulled"
            );
            outcome.column_mismatches.push((kind, values.len()));
        }
    }

    outcome
}

/// Collect the numeric tokens of one row, absorbing wrapped continuation
/// lines until the count is met, another label starts, or the footer
/// separator appears. Returns the values and the line index just past the
/// consumed lines.
fn collect_row_values(lines: &[String], row_index: usize, kind: RowKind) -> (Vec<f64>, usize) {
    let folded = fold_upper(lines[row_index].trim_start());
    let label_len = kind
        .labels()
        .iter()
        .find(|label| folded.starts_with(**label))
        .map(|label| label.len())
        .unwrap_or(0);

    let mut values = row_values(&folded[label_len..]);
    let mut next = row_index + 1;
    let continuation_end = (row_index + 1 + ROW_CONTINUATION_LINES).min(lines.len());

    while values.len() < MONTH_COLUMN_COUNT && next < continuation_end {
        let line = &lines[next];
        if is_separator_line(line) || starts_with_any_label(line) {
            break;
        }
        values.extend(row_values(&fold_upper(line)));
        next += 1;
    }

    (values, next)
}

fn starts_with_any_label(line: &str) -> bool {
    let folded = fold_upper(line.trim_start());
    RowKind::ALL
        .iter()
        .any(|kind| kind.labels().iter().any(|label| folded.starts_with(label)))
}

fn assign_row(entries: &mut [MonthlyFlowEntry], kind: RowKind, values: &[f64]) {
    for (entry, value) in entries.iter_mut().zip(values.iter().copied()) {
        match kind {
            RowKind::Max => entry.max_flow_m3s = Some(value),
            RowKind::Min => entry.min_flow_m3s = Some(value),
            RowKind::Average => entry.avg_flow_m3s = Some(value),
            RowKind::SpecificDischarge => entry.specific_discharge = Some(value),
            RowKind::DepthMm => entry.depth_mm = Some(value),
            RowKind::Volume => entry.volume_million_m3 = Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn row(label: &str, count: usize) -> String {
        let values: Vec<String> = (1..=count).map(|i| format!("{i},{i}")).collect();
        format!("{label} {}", values.join(" "))
    }

    fn full_table_page() -> Vec<String> {
        page(&[
            "header noise",
            &row("Maks.", 12),
            &row("Min.", 12),
            &row("Ortalama", 12),
            &row("LT/SN/Km2", 12),
            &row("AKIM mm.", 12),
            &row("MİL. M3", 12),
        ])
    }

    #[test]
    fn extracts_all_six_row_kinds() {
        let outcome = extract_monthly_table(&full_table_page(), 0);

        assert_eq!(outcome.rows_found.len(), 6);
        assert!(outcome.column_mismatches.is_empty());
        assert_eq!(outcome.entries.len(), 12);
        for entry in &outcome.entries {
            assert!(entry.is_fully_populated());
        }
        // Comma decimals land in calendar order: column 1 = October
        assert_eq!(outcome.entries[0].month, Month::October);
        assert_eq!(outcome.entries[0].max_flow_m3s, Some(1.1));
        assert_eq!(outcome.entries[11].max_flow_m3s, Some(12.12));
    }

    #[test]
    fn eleven_tokens_null_the_whole_row() {
        let mut lines = full_table_page();
        lines[1] = row("Maks.", 11);
        let outcome = extract_monthly_table(&lines, 0);

        assert!(outcome.column_mismatches.contains(&(RowKind::Max, 11)));
        for entry in &outcome.entries {
            assert_eq!(entry.max_flow_m3s, None);
        }
        // Other row kinds are unaffected
        for entry in &outcome.entries {
            assert!(entry.min_flow_m3s.is_some());
            assert!(entry.avg_flow_m3s.is_some());
        }
    }

    #[test]
    fn thirteen_tokens_null_the_whole_row() {
        let mut lines = full_table_page();
        lines[3] = row("Ortalama", 13);
        let outcome = extract_monthly_table(&lines, 0);

        assert!(outcome.column_mismatches.contains(&(RowKind::Average, 13)));
        for entry in &outcome.entries {
            assert_eq!(entry.avg_flow_m3s, None);
        }
    }

    #[test]
    fn missing_min_row_does_not_block_max() {
        let lines = page(&["noise", &row("Maks.", 12), &row("Ortalama", 12)]);
        let outcome = extract_monthly_table(&lines, 0);

        assert!(outcome.rows_found.contains(&RowKind::Max));
        assert!(outcome.rows_found.contains(&RowKind::Average));
        assert!(!outcome.rows_found.contains(&RowKind::Min));
        for entry in &outcome.entries {
            assert!(entry.max_flow_m3s.is_some());
            assert_eq!(entry.min_flow_m3s, None);
        }
    }

    #[test]
    fn dry_months_count_as_zero() {
        let mut lines = full_table_page();
        lines[2] = "Min. 0,5 0,4 KURU ----- 0,2 0,3 0,4 0,5 0,6 0,7 0,8 0,9".to_string();
        let outcome = extract_monthly_table(&lines, 0);

        assert!(outcome.rows_found.contains(&RowKind::Min));
        assert_eq!(outcome.entries[2].min_flow_m3s, Some(0.0));
        assert_eq!(outcome.entries[3].min_flow_m3s, Some(0.0));
        assert_eq!(outcome.entries[4].min_flow_m3s, Some(0.2));
    }

    #[test]
    fn wrapped_rows_absorb_continuation_lines() {
        let lines = page(&[
            "noise",
            "Maks. 1,1 2,2 3,3 4,4 5,5 6,6 7,7 8,8",
            "9,9 10,1 11,1 12,1",
            &row("Min.", 12),
        ]);
        let outcome = extract_monthly_table(&lines, 0);

        assert!(outcome.rows_found.contains(&RowKind::Max));
        assert_eq!(outcome.entries[11].max_flow_m3s, Some(12.1));
        assert!(outcome.rows_found.contains(&RowKind::Min));
    }

    #[test]
    fn no_anchor_yields_empty_table() {
        let lines = page(&["just", "prose", "lines"]);
        let outcome = extract_monthly_table(&lines, 0);

        assert!(outcome.rows_found.is_empty());
        assert!(outcome.entries.iter().all(|e| !e.is_fully_populated()));
        assert_eq!(outcome.end_index, 0);
    }

    #[test]
    fn anchor_search_is_bounded() {
        let mut lines = page(&["noise"]);
        lines.extend(std::iter::repeat_n("filler".to_string(), TABLE_SCAN_WINDOW));
        lines.push(row("Maks.", 12));

        let outcome = extract_monthly_table(&lines, 0);
        assert!(outcome.rows_found.is_empty());
    }
}
