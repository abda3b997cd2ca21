//! Numeric and token normalization
//!
//! Yearbook pages mix Turkish and English numeric notation: comma decimal
//! separators ("4,711"), dot thousands separators ("1.234,56"), plain
//! English notation ("1,234.56"), stray non-breaking spaces, and the
//! literal "KURU" (dry) marker for months with no flow. This module folds
//! all of that into canonical `f64` values.

use crate::constants::DRY_TOKENS;

/// Fold Turkish-specific characters to their ASCII counterparts.
///
/// PDF text extraction renders the same anchor phrase with or without
/// diacritics depending on the report year and the embedded fonts, so all
/// anchor matching happens on folded text.
pub fn fold_turkish(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ı' => 'i',
            'İ' => 'I',
            'ğ' => 'g',
            'Ğ' => 'G',
            'ü' => 'u',
            'Ü' => 'U',
            'ş' => 's',
            'Ş' => 'S',
            'ö' => 'o',
            'Ö' => 'O',
            'ç' => 'c',
            'Ç' => 'C',
            '\u{00A0}' => ' ',
            _ => c,
        })
        .collect()
}

/// Fold and uppercase a line for anchor comparison
pub fn fold_upper(text: &str) -> String {
    fold_turkish(text).to_uppercase()
}

/// True for tokens the reports print in place of a zero-flow value:
/// the word for "dry" or a run of dashes
pub fn is_dry_token(token: &str) -> bool {
    let trimmed = token.trim();
    if trimmed.len() >= 2 && trimmed.chars().all(|c| c == '-') {
        return true;
    }
    let folded = fold_upper(trimmed);
    DRY_TOKENS.contains(&folded.as_str())
}

/// Parse a locale-formatted numeric token into a canonical float.
///
/// Handles Turkish notation ("1.234,56"), English notation ("1,234.56"),
/// and separator-free decimals ("1234.56"); all three yield 1234.56.
/// Returns `None` for tokens with no parsable number.
pub fn parse_number(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{00A0}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let comma_count = cleaned.matches(',').count();
    let dot_count = cleaned.matches('.').count();

    let canonical = if comma_count > 0 && dot_count > 0 {
        // Both separators present: the rightmost one is the decimal point
        let last_comma = cleaned.rfind(',').unwrap_or(0);
        let last_dot = cleaned.rfind('.').unwrap_or(0);
        if last_comma > last_dot {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else if comma_count > 1 {
        // Multiple commas with no dot: thousands separators
        cleaned.replace(',', "")
    } else if comma_count == 1 {
        // Single comma: Turkish decimal separator
        cleaned.replace(',', ".")
    } else if dot_count > 1 {
        // Multiple dots: all but the last are thousands separators
        let last_dot = cleaned.rfind('.').unwrap_or(0);
        cleaned
            .char_indices()
            .filter(|(i, c)| *c != '.' || *i == last_dot)
            .map(|(_, c)| c)
            .collect()
    } else {
        cleaned
    };

    canonical.parse::<f64>().ok()
}

/// Resolve one table token to a value: dry markers count as 0.0,
/// numeric tokens go through [`parse_number`], anything else is `None`
/// and ignored by the caller.
pub fn token_value(token: &str) -> Option<f64> {
    if is_dry_token(token) {
        return Some(0.0);
    }
    parse_number(token)
}

/// Extract all recognized numeric values from a whitespace-split line
/// fragment, in positional order
pub fn row_values(fragment: &str) -> Vec<f64> {
    fragment.split_whitespace().filter_map(token_value).collect()
}
