//! Filesystem adapter for extracted-text yearbook dumps
//!
//! A yearbook document is a single text file whose pages are separated by
//! form-feed characters. The adapter discovers documents under the input
//! directory, splits them into pages, and strips each page down to its
//! ordered non-empty lines. Pages that fail UTF-8 decoding are recorded and
//! skipped so one corrupt page never sinks the document.

use crate::constants::{DOCUMENT_EXTENSION, PAGE_DELIMITER};
use crate::{Error, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One page of a yearbook document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// One-based page ordinal within the document
    pub number: usize,

    /// Ordered non-empty lines, trimmed of trailing whitespace
    pub lines: Vec<String>,
}

/// One yearbook document split into pages
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,

    /// File stem used as the document identifier in records and logs
    pub name: String,

    /// Water year inferred from the file name, when it carries one
    pub year_hint: Option<u16>,

    pub pages: Vec<Page>,

    /// One-based ordinals of pages that failed text decoding
    pub decode_failures: Vec<usize>,
}

/// Discover yearbook text documents under `input_dir`, sorted by path for
/// deterministic processing order
pub fn discover_documents(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(Error::input_discovery(
            format!("input directory not found: {}", input_dir.display()),
            None,
        ));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(input_dir).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(DOCUMENT_EXTENSION));
        if is_text {
            documents.push(path.to_path_buf());
        }
    }

    documents.sort();
    debug!(count = documents.len(), dir = %input_dir.display(), "documents discovered");
    Ok(documents)
}

/// Load one document and split it into pages on the form-feed delimiter.
///
/// Decoding is per page: a page whose bytes are not valid UTF-8 is dropped
/// and its ordinal recorded in `decode_failures`, while the rest of the
/// document is kept.
pub fn load_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("cannot read {}", path.display()), e))?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let mut pages = Vec::new();
    let mut decode_failures = Vec::new();
    for (index, raw) in bytes.split(|b| *b == PAGE_DELIMITER).enumerate() {
        let number = index + 1;
        match std::str::from_utf8(raw) {
            Ok(text) => {
                let lines = page_lines(text);
                if !lines.is_empty() {
                    pages.push(Page { number, lines });
                }
            }
            Err(cause) => {
                warn!(document = %name, page = number, %cause, "page decode failed, skipped");
                decode_failures.push(number);
            }
        }
    }

    Ok(Document {
        path: path.to_path_buf(),
        year_hint: year_from_name(&name),
        name,
        pages,
        decode_failures,
    })
}

/// Infer the water year from a document name like "dsi_2015.txt" or
/// "akim_gozlem_yilligi_2020.txt"
pub fn year_from_name(name: &str) -> Option<u16> {
    // Last plausible 4-digit year in the name wins
    let pattern = Regex::new(r"(19|20)\d{2}").expect("year pattern is valid");
    pattern
        .find_iter(name)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}

fn page_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
