//! Synthetic documents for unit tests

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::pdf::document::install_page_tree;

/// Document with a zero-page tree
pub(crate) fn empty_document() -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    install_page_tree(&mut doc, pages_id, &[]);
    doc
}

/// Document with `count` 200×300 pages, page N drawing the text "page N"
///
/// MediaBox and Resources sit on the page-tree root so pages inherit them.
pub(crate) fn numbered_document(count: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));

    let mut page_ids = Vec::with_capacity(count);
    for n in 1..=count {
        let content = format!("BT /F1 12 Tf 10 10 Td (page {}) Tj ET", n);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        page_ids.push(page_id);
    }

    install_page_tree(&mut doc, pages_id, &page_ids);

    if let Ok(Object::Dictionary(pages)) = doc.get_object_mut(pages_id) {
        pages.set("MediaBox", Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(200),
            Object::Integer(300),
        ]));
        let fonts = Dictionary::from_iter(vec![("F1", Object::Reference(font_id))]);
        pages.set("Resources", Object::Dictionary(Dictionary::from_iter(vec![
            ("Font", Object::Dictionary(fonts)),
        ])));
    }

    doc
}

/// The "page N" text drawn by a page built with [`numbered_document`]
pub(crate) fn page_marker(doc: &Document, page_id: ObjectId) -> String {
    let content = doc.get_page_content(page_id).expect("page content");
    marker_in(&content)
}

/// The "page N" text inside an arbitrary content stream
pub(crate) fn marker_in(content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);
    let start = text.find("(page ").expect("marker start") + 1;
    let end = start + text[start..].find(')').expect("marker end");
    text[start..end].to_string()
}
