//! Document loading, saving and page-tree plumbing shared by the PDF operations

use std::path::Path;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};
use crate::pdf::metadata::stamp_document_info;

/// Page attributes a page may inherit from its ancestors in the page tree
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Upper bound on page-tree depth, guards against Parent cycles
const MAX_TREE_DEPTH: usize = 64;

/// Load a document from bytes already in memory
pub fn load_document(bytes: &[u8]) -> Result<Document> {
    Ok(Document::load_mem(bytes)?)
}

/// Read and load a document from disk
pub fn read_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    load_document(&bytes)
}

/// Serialize a document, stamping its info dictionary and compressing streams
pub fn document_to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    stamp_document_info(doc);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| Error::Render(format!("failed to serialize document: {}", e)))?;
    Ok(bytes)
}

/// Write a document to `path`
pub fn write_document(doc: &mut Document, path: &Path) -> Result<()> {
    let bytes = document_to_bytes(doc)?;
    std::fs::write(path, bytes).map_err(|e| Error::io(path, e))
}

/// Page object IDs in document order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Install `/Pages` and `/Catalog` objects that make `page_ids` the document's pages
///
/// `pages_id` must have been reserved with `new_object_id()` before the page
/// dictionaries pointing at it as `/Parent` were created.
pub(crate) fn install_page_tree(doc: &mut Document, pages_id: ObjectId, page_ids: &[ObjectId]) {
    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_object));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);

    doc.trailer.set("Root", Object::Reference(catalog_id));

    // Every page must point back at the new tree root
    for &page_id in page_ids {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }
}

/// Follow a single level of indirection
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Look up a page attribute, walking up `/Parent` links when the page lacks it
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut node = doc.get_dictionary(page_id)?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value));
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => node = doc.get_dictionary(parent_id)?,
            Err(_) => return Ok(None),
        }
    }

    Err(Error::InvalidPdf("page tree is too deep or cyclic".to_string()))
}

/// Read a number that may be stored as an integer or a real
pub(crate) fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// The page's visible box as `[llx, lly, urx, ury]`, normalized so llx < urx and lly < ury
pub(crate) fn page_box(doc: &Document, page_id: ObjectId) -> Result<[f32; 4]> {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox")?
        .ok_or_else(|| Error::Render(format!("page {:?} has no MediaBox", page_id)))?;

    let values = resolve(doc, media_box)?
        .as_array()
        .map_err(|_| Error::Render("MediaBox is not an array".to_string()))?;

    let mut numbers = Vec::with_capacity(4);
    for value in values {
        let number = extract_number(resolve(doc, value)?)
            .ok_or_else(|| Error::Render("MediaBox entry is not a number".to_string()))?;
        numbers.push(number);
    }

    if numbers.len() != 4 {
        return Err(Error::Render(format!("MediaBox has {} entries", numbers.len())));
    }

    let (llx, urx) = (numbers[0].min(numbers[2]), numbers[0].max(numbers[2]));
    let (lly, ury) = (numbers[1].min(numbers[3]), numbers[1].max(numbers[3]));

    if urx - llx <= 0.0 || ury - lly <= 0.0 {
        return Err(Error::Render("MediaBox has zero area".to_string()));
    }

    Ok([llx, lly, urx, ury])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::empty_document;

    #[test]
    fn test_empty_document_has_no_pages() {
        let doc = empty_document();
        assert!(doc.get_pages().is_empty());
        assert!(doc.trailer.get(b"Root").is_ok());
    }

    #[test]
    fn test_load_document_rejects_garbage() {
        let result = load_document(b"this is not a pdf");
        assert!(matches!(result, Err(Error::Pdf(_))));
    }

    #[test]
    fn test_inherited_media_box() {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        let page_id = doc.add_object(page);

        install_page_tree(&mut doc, pages_id, &[page_id]);
        if let Ok(Object::Dictionary(pages)) = doc.get_object_mut(pages_id) {
            pages.set("MediaBox", Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(300),
                Object::Real(400.5),
            ]));
        }

        let bbox = page_box(&doc, page_id).unwrap();
        assert_eq!(bbox, [0.0, 0.0, 300.0, 400.5]);
    }

    #[test]
    fn test_missing_media_box_is_render_error() {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
        ]));
        install_page_tree(&mut doc, pages_id, &[page_id]);

        assert!(matches!(page_box(&doc, page_id), Err(Error::Render(_))));
    }

    #[test]
    fn test_document_to_bytes_round_trips() {
        let mut doc = empty_document();
        let bytes = document_to_bytes(&mut doc).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let reloaded = load_document(&bytes).unwrap();
        assert!(reloaded.get_pages().is_empty());
    }
}
