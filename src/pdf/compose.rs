//! Four-up sheet composition
//!
//! Every four consecutive pages of a document are embedded as Form XObjects
//! into the quadrants of one A4 portrait sheet. The first sheet can carry a
//! centered bold label.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;
use crate::error::{Error, Result};
use crate::layout::{Rect, SheetGrid, Slot, LABEL_FONT_SIZE, SLOTS_PER_SHEET};
use crate::pdf::copy::ObjectCopier;
use crate::pdf::document::{install_page_tree, inherited_attribute, page_box, page_ids, resolve};
use crate::pdf::font::{add_helvetica_bold, encode_win_ansi, escape_pdf_bytes, text_width};

/// Resource name of the label font on the first sheet
const LABEL_FONT_NAME: &str = "F1";

/// A label ready to be drawn: encoded bytes plus their measured width
struct PreparedLabel {
    encoded: Vec<u8>,
    width: f32,
    font_id: ObjectId,
}

/// Lay the pages of `doc` out four to a sheet
///
/// Sheet `k` holds pages `4k..4k+4` (fewer on the last sheet, with empty
/// slots left blank). A non-empty `label` is drawn once, on the first sheet.
/// A document without pages yields a document without sheets.
///
/// # Example
///
/// ```no_run
/// use pdf_fourup::pdf::{compose_sheets, extract_pages, read_document};
/// use std::path::Path;
///
/// let template = read_document(Path::new("template.pdf")).unwrap();
/// let pages = extract_pages(&template, &[1, 2, 3, 4, 5]).unwrap();
/// let sheets = compose_sheets(&pages, Some("03 - Jane Doe")).unwrap();
/// assert_eq!(sheets.get_pages().len(), 2);
/// ```
pub fn compose_sheets(doc: &Document, label: Option<&str>) -> Result<Document> {
    compose_sheets_on(doc, label, &SheetGrid::default())
}

pub(crate) fn compose_sheets_on(doc: &Document, label: Option<&str>, grid: &SheetGrid) -> Result<Document> {
    let source_pages = page_ids(doc);

    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();
    let mut copier = ObjectCopier::new(doc);

    let label = match label.filter(|l| !l.is_empty()) {
        Some(text) if !source_pages.is_empty() => {
            let encoded = encode_win_ansi(text)?;
            let width = text_width(&encoded, LABEL_FONT_SIZE);
            let font_id = add_helvetica_bold(&mut output);
            Some(PreparedLabel { encoded, width, font_id })
        }
        _ => None,
    };

    let mut sheet_ids = Vec::new();
    for (index, group) in source_pages.chunks(SLOTS_PER_SHEET).enumerate() {
        let sheet_label = if index == 0 { label.as_ref() } else { None };
        let sheet_id = create_sheet(&mut output, &mut copier, doc, group, sheet_label, pages_id, grid)?;
        sheet_ids.push(sheet_id);
    }

    install_page_tree(&mut output, pages_id, &sheet_ids);

    debug!(pages = source_pages.len(), sheets = sheet_ids.len(), "composed sheets");

    Ok(output)
}

/// Build one output sheet holding up to four source pages
fn create_sheet(
    output: &mut Document,
    copier: &mut ObjectCopier<'_>,
    source: &Document,
    group: &[ObjectId],
    label: Option<&PreparedLabel>,
    parent_pages_id: ObjectId,
    grid: &SheetGrid,
) -> Result<ObjectId> {
    let mut content = String::new();
    let mut xobjects = Dictionary::new();

    for (position, &page_id) in group.iter().enumerate() {
        let slot = Slot::from_index(position)
            .ok_or_else(|| Error::Render(format!("no grid slot for position {}", position)))?;

        let (xobject_id, bbox) = embed_page(output, copier, source, page_id)?;
        let name = format!("P{}", position);
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(xobject_id));

        content.push_str(&draw_page_ops(&name, bbox, grid.cell(slot)));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    if let Some(label) = label {
        let (x, y) = grid.label_origin(label.width);
        content.push_str("BT\n");
        content.push_str(&format!("/{} {} Tf\n", LABEL_FONT_NAME, LABEL_FONT_SIZE));
        content.push_str("0 0 0 rg\n"); // black fill
        content.push_str(&format!("1 0 0 1 {} {} Tm\n", x, y));
        content.push_str(&format!("({}) Tj\n", escape_pdf_bytes(&label.encoded)));
        content.push_str("ET\n");

        let mut fonts = Dictionary::new();
        fonts.set(LABEL_FONT_NAME, Object::Reference(label.font_id));
        resources.set("Font", Object::Dictionary(fonts));
    }

    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut sheet = Dictionary::new();
    sheet.set("Type", Object::Name(b"Page".to_vec()));
    sheet.set("Parent", Object::Reference(parent_pages_id));
    sheet.set("MediaBox", Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(grid.sheet.width),
        Object::Real(grid.sheet.height),
    ]));
    sheet.set("Contents", Object::Reference(content_id));
    sheet.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(sheet))
}

/// Content operators drawing a form with bounding box `bbox` stretched into `cell`
fn draw_page_ops(name: &str, bbox: [f32; 4], cell: Rect) -> String {
    let scale_x = cell.width / (bbox[2] - bbox[0]);
    let scale_y = cell.height / (bbox[3] - bbox[1]);
    format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        scale_x, scale_y, cell.x, cell.y, name
    )
}

/// Wrap a source page into a Form XObject in `output`
///
/// The form's matrix moves the page box's lower-left corner to the origin so
/// the caller only has to scale and translate. Returns the form and its box.
fn embed_page(
    output: &mut Document,
    copier: &mut ObjectCopier<'_>,
    source: &Document,
    page_id: ObjectId,
) -> Result<(ObjectId, [f32; 4])> {
    let bbox = page_box(source, page_id)?;
    let page_dict = source.get_dictionary(page_id)?;

    let (mut form_dict, content) = page_content(source, page_dict)?;

    form_dict.set("Type", Object::Name(b"XObject".to_vec()));
    form_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    form_dict.set("FormType", Object::Integer(1));
    form_dict.set("BBox", Object::Array(bbox.iter().map(|&v| Object::Real(v)).collect()));
    form_dict.set("Matrix", Object::Array(vec![
        Object::Integer(1),
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(1),
        Object::Real(-bbox[0]),
        Object::Real(-bbox[1]),
    ]));

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources")? {
        form_dict.set("Resources", copier.copy_object(output, resources)?);
    }

    let xobject_id = output.add_object(Object::Stream(Stream {
        dict: form_dict,
        content,
        allows_compression: true,
        start_position: None,
    }));

    Ok((xobject_id, bbox))
}

/// Content of a page as one form stream body, with the filter entries it still needs
///
/// A single content stream is carried over as-is, still encoded. Several
/// streams are decoded and joined, since a form holds only one stream.
fn page_content(source: &Document, page_dict: &Dictionary) -> Result<(Dictionary, Vec<u8>)> {
    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => resolve(source, contents)?,
        Err(_) => return Ok((Dictionary::new(), Vec::new())),
    };

    let streams: Vec<&Stream> = match contents {
        Object::Stream(stream) => vec![stream],
        Object::Array(parts) => {
            let mut streams = Vec::with_capacity(parts.len());
            for part in parts {
                if let Object::Stream(stream) = resolve(source, part)? {
                    streams.push(stream);
                }
            }
            streams
        }
        _ => Vec::new(),
    };

    if let [stream] = streams.as_slice() {
        let mut dict = Dictionary::new();
        for key in [b"Filter".as_slice(), b"DecodeParms".as_slice()] {
            if let Ok(value) = stream.dict.get(key) {
                dict.set(key.to_vec(), resolve(source, value)?.clone());
            }
        }
        return Ok((dict, stream.content.clone()));
    }

    let mut combined = Vec::new();
    for stream in streams {
        let decoded = if stream.dict.has(b"Filter") {
            stream
                .decompressed_content()
                .map_err(|e| Error::Render(format!("cannot decode page content: {}", e)))?
        } else {
            stream.content.clone()
        };
        combined.extend_from_slice(&decoded);
        combined.push(b'\n');
    }
    Ok((Dictionary::new(), combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::extract::extract_pages;
    use crate::pdf::testing::{marker_in, numbered_document};

    /// Markers of the pages embedded on a sheet, in slot order
    fn sheet_markers(doc: &Document, sheet_id: ObjectId) -> Vec<String> {
        let sheet = doc.get_dictionary(sheet_id).unwrap();
        let resources = sheet.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();

        (0..SLOTS_PER_SHEET)
            .filter_map(|i| xobjects.get(format!("P{}", i).as_bytes()).ok())
            .map(|obj| {
                let id = obj.as_reference().unwrap();
                let stream = doc.get_object(id).unwrap().as_stream().unwrap();
                marker_in(&stream.content)
            })
            .collect()
    }

    fn has_label_font(doc: &Document, sheet_id: ObjectId) -> bool {
        let sheet = doc.get_dictionary(sheet_id).unwrap();
        let resources = sheet.get(b"Resources").unwrap().as_dict().unwrap();
        resources.has(b"Font")
    }

    fn sheet_content(doc: &Document, sheet_id: ObjectId) -> String {
        String::from_utf8_lossy(&doc.get_page_content(sheet_id).unwrap()).into_owned()
    }

    #[test]
    fn test_sheet_count_and_grouping() {
        let source = numbered_document(9);
        let sheets = compose_sheets(&source, None).unwrap();
        let ids = page_ids(&sheets);

        assert_eq!(ids.len(), 3);
        assert_eq!(sheet_markers(&sheets, ids[0]), vec!["page 1", "page 2", "page 3", "page 4"]);
        assert_eq!(sheet_markers(&sheets, ids[1]), vec!["page 5", "page 6", "page 7", "page 8"]);
        assert_eq!(sheet_markers(&sheets, ids[2]), vec!["page 9"]);
    }

    #[test]
    fn test_partial_sheet_draws_only_present_pages() {
        let source = numbered_document(2);
        let sheets = compose_sheets(&source, None).unwrap();
        let id = page_ids(&sheets)[0];

        let content = sheet_content(&sheets, id);
        assert_eq!(content.matches(" Do ").count(), 2);
    }

    #[test]
    fn test_sheets_are_a4() {
        let source = numbered_document(1);
        let sheets = compose_sheets(&source, None).unwrap();
        let id = page_ids(&sheets)[0];

        assert_eq!(page_box(&sheets, id).unwrap(), [0.0, 0.0, 595.28, 841.89]);
    }

    #[test]
    fn test_pages_are_stretched_into_cells() {
        let source = numbered_document(1);
        let sheets = compose_sheets(&source, None).unwrap();
        let content = sheet_content(&sheets, page_ids(&sheets)[0]);

        // 200×300 source into the top-left cell
        let grid = SheetGrid::default();
        let cell = grid.cell(Slot::TopLeft);
        let expected = format!(
            "q {} 0 0 {} {} {} cm /P0 Do Q",
            cell.width / 200.0,
            cell.height / 300.0,
            cell.x,
            cell.y
        );
        assert!(content.contains(&expected), "content was: {}", content);
    }

    #[test]
    fn test_label_only_on_first_sheet() {
        let source = numbered_document(6);
        let sheets = compose_sheets(&source, Some("Jane Doe")).unwrap();
        let ids = page_ids(&sheets);

        assert!(sheet_content(&sheets, ids[0]).contains("(Jane Doe) Tj"));
        assert!(has_label_font(&sheets, ids[0]));

        assert!(!sheet_content(&sheets, ids[1]).contains("Tj"));
        assert!(!has_label_font(&sheets, ids[1]));
    }

    #[test]
    fn test_label_is_centered() {
        let source = numbered_document(1);
        let sheets = compose_sheets(&source, Some("Hi")).unwrap();
        let content = sheet_content(&sheets, page_ids(&sheets)[0]);

        let width = text_width(b"Hi", LABEL_FONT_SIZE);
        let (x, y) = SheetGrid::default().label_origin(width);
        assert!(content.contains(&format!("1 0 0 1 {} {} Tm", x, y)));
        assert!(content.contains("/F1 24 Tf"));
    }

    #[test]
    fn test_empty_label_draws_nothing() {
        let source = numbered_document(2);
        let sheets = compose_sheets(&source, Some("")).unwrap();
        let id = page_ids(&sheets)[0];

        assert!(!sheet_content(&sheets, id).contains("Tj"));
        assert!(!has_label_font(&sheets, id));
    }

    #[test]
    fn test_empty_document_gives_no_sheets() {
        let source = numbered_document(3);
        let empty = extract_pages(&source, &[]).unwrap();

        let sheets = compose_sheets(&empty, Some("Nobody")).unwrap();
        assert!(sheets.get_pages().is_empty());
    }

    #[test]
    fn test_unencodable_label_is_render_error() {
        let source = numbered_document(1);
        let result = compose_sheets(&source, Some("Łukasz"));
        assert!(matches!(result, Err(Error::Render(_))));
    }

    /// The form embedded in the top-left slot of the first sheet
    fn first_form(sheets: &Document) -> &Stream {
        let sheet = sheets.get_dictionary(page_ids(sheets)[0]).unwrap();
        let xobjects = sheet
            .get(b"Resources").unwrap().as_dict().unwrap()
            .get(b"XObject").unwrap().as_dict().unwrap();
        let form_id = xobjects.get(b"P0").unwrap().as_reference().unwrap();
        sheets.get_object(form_id).unwrap().as_stream().unwrap()
    }

    /// Content long and repetitive enough that Flate compression pays off
    fn drawing_ops(marker: &str) -> Vec<u8> {
        format!("BT ({}) Tj ET\n{}", marker, "0 0 m 10 10 l S\n".repeat(40)).into_bytes()
    }

    fn set_stream_content(doc: &mut Document, id: ObjectId, content: Vec<u8>) {
        if let Ok(Object::Stream(stream)) = doc.get_object_mut(id) {
            stream.set_content(content);
        }
    }

    #[test]
    fn test_compressed_content_is_carried_encoded() {
        let mut source = numbered_document(1);
        let page_id = page_ids(&source)[0];
        let content_id = source
            .get_dictionary(page_id).unwrap()
            .get(b"Contents").unwrap()
            .as_reference().unwrap();
        set_stream_content(&mut source, content_id, drawing_ops("page 1"));
        source.compress();
        assert!(source.get_object(content_id).unwrap().as_stream().unwrap().dict.has(b"Filter"));

        let sheets = compose_sheets(&source, None).unwrap();
        let form = first_form(&sheets);

        assert_eq!(form.dict.get(b"Filter").unwrap().as_name().unwrap(), b"FlateDecode");
        assert_eq!(form.decompressed_content().unwrap(), drawing_ops("page 1"));
    }

    #[test]
    fn test_multiple_content_streams_are_joined() {
        let mut source = numbered_document(1);
        let page_id = page_ids(&source)[0];
        let first_id = source
            .get_dictionary(page_id).unwrap()
            .get(b"Contents").unwrap()
            .as_reference().unwrap();
        set_stream_content(&mut source, first_id, drawing_ops("page 1"));
        let second_id = source.add_object(Stream::new(Dictionary::new(), drawing_ops("page extra")));

        if let Ok(Object::Dictionary(page)) = source.get_object_mut(page_id) {
            page.set("Contents", Object::Array(vec![
                Object::Reference(first_id),
                Object::Reference(second_id),
            ]));
        }
        source.compress();

        let sheets = compose_sheets(&source, None).unwrap();
        let form = first_form(&sheets);

        let mut expected = drawing_ops("page 1");
        expected.push(b'\n');
        expected.extend_from_slice(&drawing_ops("page extra"));
        expected.push(b'\n');

        assert!(!form.dict.has(b"Filter"));
        assert_eq!(form.content, expected);
    }

    #[test]
    fn test_embedded_forms_carry_page_resources() {
        let source = numbered_document(1);
        let sheets = compose_sheets(&source, None).unwrap();
        let form = first_form(&sheets);

        assert_eq!(form.dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Form");
        let resources = form.dict.get(b"Resources").unwrap().as_dict().unwrap();
        assert!(resources.has(b"Font"));
    }
}
