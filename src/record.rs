//! Table records and what each one resolves to: label, pages and output filename

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref LEADING_DIGITS: Regex = Regex::new(r"^[0-9]+").unwrap();
    static ref LEADING_INTEGER: Regex = Regex::new(r"^[+-]?[0-9]+").unwrap();
    static ref NUMBER_PREFIX: Regex = Regex::new(r"^[0-9]+\s*-\s*").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\-]").unwrap();
}

/// One row of the data table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Display name, drawn as the label
    pub name: String,
    /// Comma-separated 1-based page numbers
    pub pages: String,
}

/// Everything needed to render one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub name: String,
    pub page_numbers: Vec<i64>,
    pub file_name: String,
}

impl Record {
    pub fn new(name: impl Into<String>, pages: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: pages.into(),
        }
    }

    /// Resolve this record, `row_index` being its 0-based position in the table
    pub fn resolve(&self, row_index: usize) -> ResolvedRecord {
        ResolvedRecord {
            name: self.name.clone(),
            page_numbers: parse_page_numbers(&self.pages),
            file_name: output_file_name(&self.name, row_index),
        }
    }
}

/// Parse a comma-separated page list
///
/// Each trimmed token contributes its leading integer (`"2a"` reads as 2,
/// `"3.5"` as 3). Tokens that do not start with a number are skipped.
pub fn parse_page_numbers(pages: &str) -> Vec<i64> {
    pages.split(',').filter_map(leading_integer).collect()
}

/// Leading signed integer of a token, saturating at the `i64` bounds
fn leading_integer(token: &str) -> Option<i64> {
    let matched = LEADING_INTEGER.find(token.trim())?.as_str();
    // Only overflow can fail here; a saturated value still fails the range check
    Some(matched.parse().unwrap_or(if matched.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Row prefix: leading digits of the name, else the 1-based row number padded to two digits
pub fn row_prefix(name: &str, row_index: usize) -> String {
    match LEADING_DIGITS.find(name) {
        Some(digits) => digits.as_str().to_string(),
        None => format!("{:02}", row_index + 1),
    }
}

/// Filesystem-safe form of a name
///
/// Drops a leading "NN - " number prefix, turns whitespace runs into single
/// underscores and removes anything outside `[A-Za-z0-9_-]`.
pub fn sanitize_name(name: &str) -> String {
    let without_prefix = NUMBER_PREFIX.replace(name, "");
    let underscored = WHITESPACE_RUN.replace_all(&without_prefix, "_");
    UNSAFE_CHARS.replace_all(&underscored, "").into_owned()
}

/// Output filename for a record: `<prefix>_<sanitized name>.pdf`
pub fn output_file_name(name: &str, row_index: usize) -> String {
    format!("{}_{}.pdf", row_prefix(name, row_index), sanitize_name(name))
}
