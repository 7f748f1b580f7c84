//! PDF Four-Up Library
//!
//! Turns a template PDF and a delimited data table into personalized handouts.
//! For every table record this library:
//! - Extracts the record's pages from the template, in the listed order
//! - Lays them out four to an A4 sheet, labelling the first sheet with the record's name
//! - Writes the result under a filename derived from the name
//!
//! With more than one record, all generated documents are also merged into one.
//!
//! # Example
//!
//! ```no_run
//! use pdf_fourup::batch::{run_files, BatchOptions};
//! use std::path::Path;
//!
//! run_files(
//!     Path::new("people.csv"),
//!     Path::new("template.pdf"),
//!     Path::new("handouts"),
//!     &BatchOptions::default(),
//! ).expect("Failed to generate handouts");
//! ```

pub mod batch;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod record;
pub mod table;

// Re-export commonly used items
pub use error::{Error, Result};
pub use record::{Record, ResolvedRecord};
