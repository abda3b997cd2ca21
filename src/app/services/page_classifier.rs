//! Cheap page classification
//!
//! Multi-hundred-page yearbooks are overwhelmingly made up of pages that are
//! not target-station pages, so classification must reject them without
//! scanning the page body. Station pages put their code on a conventional
//! early line (the second non-empty line, after the basin heading); the
//! classifier inspects only a small fixed prefix of lines, making the
//! rejection path O(1) in page length.

use super::station_matcher::StationMatcher;
use crate::constants::CLASSIFIER_PREFIX_LINES;
use std::sync::Arc;
use tracing::debug;

/// Classification outcome for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageClass {
    /// No station-code token in the classifier prefix
    NotStationPage,

    /// A station code matched but is not in the configured target set;
    /// logged distinctly from a parse failure, skipped for output
    ForeignStation { code: String },

    /// A target station code was found; the page goes to the extractors
    Candidate { line_index: usize, code: String },
}

/// Classifies pages by inspecting a fixed-size line prefix
#[derive(Debug, Clone)]
pub struct PageClassifier {
    matcher: Arc<StationMatcher>,
}

impl PageClassifier {
    /// Create a classifier over the given station matcher
    pub fn new(matcher: Arc<StationMatcher>) -> Self {
        Self { matcher }
    }

    /// Classify one page from its ordered, non-empty text lines.
    ///
    /// Inspects at most [`CLASSIFIER_PREFIX_LINES`] lines regardless of page
    /// length; the full page is never scanned here.
    pub fn classify(&self, lines: &[String]) -> PageClass {
        let prefix_end = CLASSIFIER_PREFIX_LINES.min(lines.len());

        for (index, line) in lines[..prefix_end].iter().enumerate() {
            if let Some(found) = self.matcher.find_code(line) {
                if self.matcher.is_target(&found.code) {
                    return PageClass::Candidate {
                        line_index: index,
                        code: found.code,
                    };
                }
                debug!(code = %found.code, "station code outside target set");
                return PageClass::ForeignStation { code: found.code };
            }
        }

        PageClass::NotStationPage
    }

    /// The matcher backing this classifier
    pub fn matcher(&self) -> &StationMatcher {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PageClassifier {
        PageClassifier::new(Arc::new(StationMatcher::new(["D22A093"])))
    }

    fn page(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classifies_target_station_page() {
        let lines = page(&["22. Doğu Karadeniz Havzası", "D22A093 TURNASUYU", "..."]);
        assert_eq!(
            classifier().classify(&lines),
            PageClass::Candidate {
                line_index: 1,
                code: "D22A093".to_string()
            }
        );
    }

    #[test]
    fn rejects_pages_without_codes() {
        let lines = page(&["index of contents", "chapter one", "more text"]);
        assert_eq!(classifier().classify(&lines), PageClass::NotStationPage);
    }

    #[test]
    fn foreign_station_is_distinct_from_rejection() {
        let lines = page(&["22. Doğu Karadeniz Havzası", "D22A999 OTHER STREAM"]);
        assert_eq!(
            classifier().classify(&lines),
            PageClass::ForeignStation {
                code: "D22A999".to_string()
            }
        );
    }

    #[test]
    fn never_inspects_beyond_fixed_prefix() {
        // The code appears deep in the body; classification must not see it
        let mut lines = page(&["noise", "noise", "noise", "noise"]);
        lines.extend(std::iter::repeat_n("filler".to_string(), 50));
        lines.push("D22A093 BURIED STATION".to_string());

        assert_eq!(classifier().classify(&lines), PageClass::NotStationPage);
    }

    #[test]
    fn empty_page_is_not_a_station_page() {
        assert_eq!(classifier().classify(&[]), PageClass::NotStationPage);
    }
}
