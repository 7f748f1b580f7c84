//! Page extraction: copy a chosen sequence of pages into a new document

use lopdf::{Document, Object, ObjectId};
use tracing::debug;
use crate::error::{Error, Result};
use crate::pdf::copy::ObjectCopier;
use crate::pdf::document::{install_page_tree, inherited_attribute, page_ids, INHERITABLE_KEYS};

/// Build a new document holding the given 1-based pages of `source`, in the given order
///
/// Repeated page numbers produce repeated pages. Each page is copied, so the
/// result shares nothing with `source`; attributes the page inherits from the
/// source page tree are written onto the copy.
///
/// # Example
///
/// ```no_run
/// use pdf_fourup::pdf::{extract_pages, read_document};
/// use std::path::Path;
///
/// let template = read_document(Path::new("template.pdf")).unwrap();
/// let handout = extract_pages(&template, &[3, 1, 2]).unwrap();
/// assert_eq!(handout.get_pages().len(), 3);
/// ```
pub fn extract_pages(source: &Document, page_numbers: &[i64]) -> Result<Document> {
    let source_pages = page_ids(source);
    let page_count = source_pages.len();

    // Validate everything up front so a bad request builds nothing
    for &page in page_numbers {
        if page < 1 || page as usize > page_count {
            return Err(Error::PageOutOfRange { page, page_count });
        }
    }

    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();
    let mut copier = ObjectCopier::new(source);
    let mut new_page_ids = Vec::with_capacity(page_numbers.len());

    for &page in page_numbers {
        let source_id = source_pages[(page - 1) as usize];
        let new_id = copy_page(&mut output, &mut copier, source, source_id)?;
        new_page_ids.push(new_id);
    }

    install_page_tree(&mut output, pages_id, &new_page_ids);

    debug!(
        requested = page_numbers.len(),
        source_pages = page_count,
        "extracted pages"
    );

    Ok(output)
}

/// Copy one page dictionary, materializing inherited attributes
fn copy_page(
    output: &mut Document,
    copier: &mut ObjectCopier<'_>,
    source: &Document,
    page_id: ObjectId,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let mut new_page = copier.copy_dictionary(output, page_dict, &[b"Parent".as_slice()])?;

    for key in INHERITABLE_KEYS {
        if new_page.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page_id, key)? {
            let copied = copier.copy_object(output, value)?;
            new_page.set(key.to_vec(), copied);
        }
    }

    new_page.set("Type", Object::Name(b"Page".to_vec()));
    Ok(output.add_object(new_page))
}
