//! Error types for the four-up handout generator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the four-up handout library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF could not be parsed or an object lookup failed
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// PDF parsed but is structurally unusable
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// Requested page is outside the source document
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: i64, page_count: usize },

    /// Drawing onto an output sheet failed
    #[error("Render error: {0}")]
    Render(String),

    /// Delimited table could not be read
    #[error("Table error: {0}")]
    Table(#[from] csv::Error),

    /// Table header lacks a required column
    #[error("Table is missing required column '{0}'")]
    MissingColumn(String),

    /// Table has a header but no data rows
    #[error("Table contains no records")]
    EmptyTable,

    /// Row index past the end of the table
    #[error("Row {row} does not exist (table has {count} records)")]
    RowOutOfRange { row: usize, count: usize },

    /// Filesystem error with the path that caused it
    #[error("IO error on {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
