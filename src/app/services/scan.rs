//! Bounded anchor scanning shared by the header, table, and footer extractors
//!
//! All three extractors locate content by scanning forward from a known line
//! for an anchor phrase within a bounded window. Centralizing the scan keeps
//! the cost bound consistent and independently testable.

use super::normalizer::fold_upper;

/// Find the first line at or after `start`, within `max_window` lines, whose
/// folded uppercase text contains any of the anchor phrases.
///
/// Anchor phrases must already be Turkish-folded and uppercased (as the
/// tables in [`crate::constants::anchors`] are). Returns the absolute line
/// index, or `None` when no anchor appears inside the window.
pub fn find_anchor(
    lines: &[String],
    start: usize,
    max_window: usize,
    anchors: &[&str],
) -> Option<usize> {
    let end = start.saturating_add(max_window).min(lines.len());
    lines[start.min(lines.len())..end]
        .iter()
        .position(|line| {
            let folded = fold_upper(line);
            anchors.iter().any(|anchor| folded.contains(anchor))
        })
        .map(|offset| start + offset)
}

/// Find the first line at or after `start`, within `max_window` lines, whose
/// folded uppercase text *starts with* any of the given labels.
///
/// Used for table row labels, which anchor at the beginning of the line so
/// that value tokens cannot be mistaken for labels.
pub fn find_labeled_line(
    lines: &[String],
    start: usize,
    max_window: usize,
    labels: &[&str],
) -> Option<usize> {
    let end = start.saturating_add(max_window).min(lines.len());
    lines[start.min(lines.len())..end]
        .iter()
        .position(|line| {
            let folded = fold_upper(line.trim_start());
            labels.iter().any(|label| folded.starts_with(label))
        })
        .map(|offset| start + offset)
}

/// True for separator marker lines: a run of at least
/// [`crate::constants::SEPARATOR_MIN_RUN`] repeated '=' or '-' characters
pub fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= crate::constants::SEPARATOR_MIN_RUN
        && (trimmed.chars().all(|c| c == '=') || trimmed.chars().all(|c| c == '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_anchor_within_window() {
        let page = lines(&["heading", "noise", "YAĞIŞ ALANI : 210,00 km2", "tail"]);
        assert_eq!(find_anchor(&page, 0, 10, &["YAGIS ALANI"]), Some(2));
    }

    #[test]
    fn respects_window_bound() {
        let page = lines(&["a", "b", "c", "YAĞIŞ ALANI : 210,00"]);
        assert_eq!(find_anchor(&page, 0, 3, &["YAGIS ALANI"]), None);
        assert_eq!(find_anchor(&page, 0, 4, &["YAGIS ALANI"]), Some(3));
    }

    #[test]
    fn start_past_end_is_none() {
        let page = lines(&["only line"]);
        assert_eq!(find_anchor(&page, 5, 10, &["ONLY"]), None);
    }

    #[test]
    fn labeled_line_requires_line_start() {
        let page = lines(&["values Maks. 1.0", "Maks.  1.1 2.2"]);
        assert_eq!(find_labeled_line(&page, 0, 10, &["MAKS"]), Some(1));
    }

    #[test]
    fn separator_lines_need_a_uniform_run() {
        assert!(is_separator_line("===="));
        assert!(is_separator_line("  ----------  "));
        assert!(!is_separator_line("==="));
        assert!(!is_separator_line("=-=-"));
        assert!(!is_separator_line("text"));
    }
}
