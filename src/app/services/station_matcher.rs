//! Station code recognition and target-set membership
//!
//! DSI station codes follow a fixed alphanumeric grammar: a letter, two
//! digits, a letter, three digits (e.g. "D22A093"). The matcher finds the
//! first code-shaped token in a line and tests it against the configured
//! target set, case-insensitively.

use crate::constants::STATION_CODE_PATTERN;
use regex::Regex;
use std::collections::HashSet;

/// A station code match within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMatch {
    /// Uppercased station code
    pub code: String,

    /// Byte offset just past the code token, for station-name extraction
    pub end: usize,
}

/// Recognizes station codes and tests target-set membership
#[derive(Debug)]
pub struct StationMatcher {
    pattern: Regex,
    targets: HashSet<String>,
}

impl StationMatcher {
    /// Create a matcher for the given target stations (codes are
    /// case-normalized on the way in)
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = targets
            .into_iter()
            .map(|code| code.as_ref().trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect();

        Self {
            pattern: Regex::new(STATION_CODE_PATTERN).expect("station code pattern is valid"),
            targets,
        }
    }

    /// Find the first station-code token in a line, tolerating surrounding
    /// whitespace and punctuation
    pub fn find_code(&self, line: &str) -> Option<CodeMatch> {
        self.pattern.find(line).map(|m| CodeMatch {
            code: m.as_str().to_uppercase(),
            end: m.end(),
        })
    }

    /// Exact, case-insensitive membership test against the target set
    pub fn is_target(&self, code: &str) -> bool {
        self.targets.contains(&code.trim().to_uppercase())
    }

    /// Number of configured target stations
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Iterate the configured target codes in arbitrary order
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> StationMatcher {
        StationMatcher::new(["D22A093", "e22a065"])
    }

    #[test]
    fn finds_first_code_in_line() {
        let m = matcher();
        let found = m.find_code("D22A093 TURNASUYU CUMHURİYET KÖYÜ").unwrap();
        assert_eq!(found.code, "D22A093");
        assert_eq!(found.end, 7);
    }

    #[test]
    fn tolerates_surrounding_whitespace_and_punctuation() {
        let m = matcher();
        assert_eq!(m.find_code("  (d22a093) ").unwrap().code, "D22A093");
        assert_eq!(m.find_code("\tE22A065:").unwrap().code, "E22A065");
    }

    #[test]
    fn no_match_for_malformed_codes() {
        let m = matcher();
        assert!(m.find_code("DA22093 name").is_none());
        assert!(m.find_code("D2A093").is_none());
        assert!(m.find_code("plain text line").is_none());
    }

    #[test]
    fn membership_is_case_insensitive_and_exact() {
        let m = matcher();
        assert!(m.is_target("d22a093"));
        assert!(m.is_target("E22A065"));
        assert!(!m.is_target("D22A094"));
        assert_eq!(m.target_count(), 2);
    }
}
