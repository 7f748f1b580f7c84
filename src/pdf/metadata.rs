//! PDF metadata: page counts and the document info dictionary

use std::path::Path;
use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};
use crate::error::{Error, Result};
use crate::pdf::document::read_document;

/// Name written as Producer and Creator of every generated document
pub const PRODUCER: &str = concat!("pdf-fourup ", env!("CARGO_PKG_VERSION"));

/// Count pages by reading the Count field from the Pages dictionary
fn count_pages_from_catalog(doc: &Document) -> Result<usize> {
    let catalog = doc.catalog()
        .map_err(|_| Error::InvalidPdf("no catalog".to_string()))?;

    let pages_id = catalog.get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| Error::InvalidPdf("catalog has no Pages reference".to_string()))?;

    let count = doc.get_dictionary(pages_id)?
        .get(b"Count")
        .and_then(Object::as_i64)
        .map_err(|_| Error::InvalidPdf("Pages has no integer Count".to_string()))?;

    usize::try_from(count)
        .map_err(|_| Error::InvalidPdf(format!("negative page count {}", count)))
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }

    let doc = read_document(path)?;
    count_pages_from_catalog(&doc)
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSSZ`)
pub fn pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Attach a fresh info dictionary naming this tool and the current time
pub(crate) fn stamp_document_info(doc: &mut Document) {
    let now = pdf_date(Utc::now());
    let text = |s: &str| Object::String(s.as_bytes().to_vec(), StringFormat::Literal);

    let mut info = Dictionary::new();
    info.set("Producer", text(PRODUCER));
    info.set("Creator", text(PRODUCER));
    info.set("CreationDate", text(&now));
    info.set("ModDate", text(&now));

    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));
}
