//! PDF manipulation module

pub mod compose;
mod copy;
pub mod document;
pub mod extract;
pub mod font;
pub mod merge;
pub mod metadata;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use compose::compose_sheets;
pub use document::{document_to_bytes, load_document, read_document, write_document};
pub use extract::extract_pages;
pub use merge::{merge_documents, merge_pdfs, MergeOptions};
pub use metadata::count_pages;
