//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::path::PathBuf;
use lopdf::{Document, Object, ObjectId};
use tracing::debug;
use crate::error::{Error, Result};
use crate::pdf::document::{install_page_tree, page_ids, read_document, write_document};

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// Concatenate the pages of `documents`, in order, into one document
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// Documents without pages contribute nothing.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    // Define a starting max_id for merged document
    let mut max_id = 1;
    let mut page_ids_in_order: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        let pages = page_ids(&doc);
        if pages.is_empty() {
            continue;
        }

        // The info dictionary is replaced when the merged document is saved
        if let Some(Object::Reference(info_id)) = doc.trailer.remove(b"Info") {
            doc.objects.remove(&info_id);
        }

        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = page_ids(&doc);
        page_ids_in_order.extend(pages);

        // The old page-tree roots and catalogs are replaced
        for (id, object) in doc.objects {
            if is_tree_node(&object) {
                continue;
            }
            objects.insert(id, object);
        }
    }

    let mut merged_doc = Document::with_version("1.7");

    // Add all collected objects FIRST
    merged_doc.objects.extend(objects);

    // Keep new_object_id() above every object just added
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();
    install_page_tree(&mut merged_doc, pages_id, &page_ids_in_order);

    debug!(pages = page_ids_in_order.len(), "merged documents");

    Ok(merged_doc)
}

/// Catalog or intermediate page-tree node
fn is_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Catalog") | Ok(b"Pages")
        ),
        _ => false,
    }
}

/// Merge multiple PDF files into a single PDF
///
/// # Example
///
/// ```no_run
/// use pdf_fourup::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("out/01_Ann.pdf"),
///         PathBuf::from("out/02_Bob.pdf"),
///     ],
///     output_path: PathBuf::from("out/merged.pdf"),
/// };
///
/// merge_pdfs(&options).expect("Failed to merge");
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<()> {
    let mut documents: Vec<Document> = Vec::with_capacity(options.input_paths.len());
    for path in &options.input_paths {
        if !path.exists() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            ));
        }
        documents.push(read_document(path)?);
    }

    let mut merged = merge_documents(documents)?;
    write_document(&mut merged, &options.output_path)
}
