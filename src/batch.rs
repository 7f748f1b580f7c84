//! Batch generation: one four-up document per table record, plus a merged copy

use std::path::{Path, PathBuf};
use lopdf::Document;
use tracing::info;
use crate::error::{Error, Result};
use crate::pdf::{compose_sheets, document_to_bytes, extract_pages, load_document, merge_pdfs, MergeOptions};
use crate::record::{Record, ResolvedRecord};
use crate::table::load_table;

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Field delimiter of the data table
    pub delimiter: u8,
    /// File name of the merged document inside the output directory
    pub merged_file_name: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            merged_file_name: "merged.pdf".to_string(),
        }
    }
}

/// A rendered record, ready to be written
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// What a batch run wrote
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-record files, in table order
    pub generated: Vec<PathBuf>,
    /// Merged document, present when more than one record was processed
    pub merged: Option<PathBuf>,
}

/// Extract a record's pages and lay them out four to a sheet
pub fn render_record(source: &Document, record: &ResolvedRecord) -> Result<Document> {
    let extracted = extract_pages(source, &record.page_numbers)?;
    compose_sheets(&extracted, Some(&record.name))
}

/// Render a record into the bytes of its output file at `path`
pub fn generate_file(source: &Document, record: &ResolvedRecord, path: PathBuf) -> Result<GeneratedFile> {
    let mut doc = render_record(source, record)?;
    let bytes = document_to_bytes(&mut doc)?;
    Ok(GeneratedFile { path, bytes })
}

fn write_generated(file: &GeneratedFile) -> Result<()> {
    std::fs::write(&file.path, &file.bytes).map_err(|e| Error::io(&file.path, e))
}

/// Generate documents for every record from the template bytes
///
/// With one record `output` is the file to write. With several, `output` is a
/// directory (created if needed) that receives one file per record and the
/// merged document. Processing stops at the first failing record.
pub fn run_batch(
    template: &[u8],
    records: &[Record],
    output: &Path,
    options: &BatchOptions,
) -> Result<BatchReport> {
    run_batch_with_progress(template, records, output, options, |_| {})
}

/// [`run_batch`], calling `on_generated` with each per-record file right after it is written
///
/// Files reported before a failing record stay on disk.
pub fn run_batch_with_progress(
    template: &[u8],
    records: &[Record],
    output: &Path,
    options: &BatchOptions,
    mut on_generated: impl FnMut(&Path),
) -> Result<BatchReport> {
    if records.is_empty() {
        return Err(Error::EmptyTable);
    }

    let source = load_document(template)?;

    if let [record] = records {
        let resolved = record.resolve(0);
        let file = generate_file(&source, &resolved, output.to_path_buf())?;
        write_generated(&file)?;
        info!(path = %file.path.display(), "generated");
        on_generated(&file.path);

        return Ok(BatchReport {
            generated: vec![file.path],
            merged: None,
        });
    }

    std::fs::create_dir_all(output).map_err(|e| Error::io(output, e))?;

    let mut generated = Vec::with_capacity(records.len());
    for (row_index, record) in records.iter().enumerate() {
        let resolved = record.resolve(row_index);
        let file = generate_file(&source, &resolved, output.join(&resolved.file_name))?;
        write_generated(&file)?;
        info!(path = %file.path.display(), "generated");
        on_generated(&file.path);
        generated.push(file.path);
    }

    let merged_path = if output.is_dir() {
        output.join(&options.merged_file_name)
    } else {
        output.to_path_buf()
    };

    merge_pdfs(&MergeOptions {
        input_paths: generated.clone(),
        output_path: merged_path.clone(),
    })?;
    info!(path = %merged_path.display(), files = generated.len(), "merged");

    Ok(BatchReport {
        generated,
        merged: Some(merged_path),
    })
}

fn read_template(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io(path, e))
}

/// Run a whole batch from a table file and a template file
///
/// # Example
///
/// ```no_run
/// use pdf_fourup::batch::{run_files, BatchOptions};
/// use std::path::Path;
///
/// let report = run_files(
///     Path::new("people.csv"),
///     Path::new("template.pdf"),
///     Path::new("out"),
///     &BatchOptions::default(),
/// ).expect("batch failed");
/// println!("{} files", report.generated.len());
/// ```
pub fn run_files(
    table_path: &Path,
    template_path: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<BatchReport> {
    run_files_with_progress(table_path, template_path, output, options, |_| {})
}

/// [`run_files`] with a per-file callback, see [`run_batch_with_progress`]
pub fn run_files_with_progress(
    table_path: &Path,
    template_path: &Path,
    output: &Path,
    options: &BatchOptions,
    on_generated: impl FnMut(&Path),
) -> Result<BatchReport> {
    let records = load_table(table_path, options.delimiter)?;
    let template = read_template(template_path)?;
    run_batch_with_progress(&template, &records, output, options, on_generated)
}

/// Render a single table row to `output`
///
/// The file name rule still sees the row's real position, but the output path
/// is taken as given.
pub fn generate_row(
    table_path: &Path,
    template_path: &Path,
    output: &Path,
    row_index: usize,
    options: &BatchOptions,
) -> Result<PathBuf> {
    let records = load_table(table_path, options.delimiter)?;
    let record = records.get(row_index).ok_or(Error::RowOutOfRange {
        row: row_index,
        count: records.len(),
    })?;

    let source = load_document(&read_template(template_path)?)?;
    let file = generate_file(&source, &record.resolve(row_index), output.to_path_buf())?;
    write_generated(&file)?;
    info!(path = %file.path.display(), row = row_index, "generated");

    Ok(file.path)
}
