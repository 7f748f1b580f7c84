//! Delimited data table loading

use std::path::Path;
use crate::error::{Error, Result};
use crate::record::Record;

/// Columns every table must have
pub const REQUIRED_COLUMNS: [&str; 2] = ["name", "pages"];

/// Parse a delimited table with a header row into records
///
/// Blank lines are skipped and columns other than the required ones are
/// ignored. A header without data rows yields an empty list.
pub fn parse_table(data: &str, delimiter: u8) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: Record = row?;
        records.push(record);
    }
    Ok(records)
}

/// Read and parse a table file
pub fn load_table(path: &Path, delimiter: u8) -> Result<Vec<Record>> {
    let data = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_table(&data, delimiter)
}
