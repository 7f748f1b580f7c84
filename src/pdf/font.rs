//! Bold label font: the standard Helvetica-Bold with WinAnsiEncoding
//!
//! Standard-14 fonts need no embedded program, only the font dictionary. Text
//! is encoded to single WinAnsi bytes and measured with the font's metrics.

use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Add a Helvetica-Bold font dictionary to the document
pub fn add_helvetica_bold(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica-Bold".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

    doc.add_object(Object::Dictionary(font))
}

/// Encode text as WinAnsi (Windows-1252) bytes
///
/// Fails on characters the encoding cannot represent, since the standard
/// font would have no glyph to draw for them.
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            win_ansi_byte(c).ok_or_else(|| {
                Error::Render(format!(
                    "character {:?} (U+{:04X}) cannot be encoded in WinAnsiEncoding",
                    c, c as u32
                ))
            })
        })
        .collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}

/// Width of WinAnsi-encoded text at `font_size`, in points
///
/// Sum of advance widths only. The label is drawn with `Tj` and no kerning
/// adjustments, so pair kerning is left out of the measurement too; for pairs
/// such as "AV" or "To" the centered label sits up to about a point off from a
/// kerned layout.
pub fn text_width(encoded: &[u8], font_size: f32) -> f32 {
    let units: u32 = encoded.iter().map(|&b| glyph_width(b) as u32).sum();
    units as f32 * font_size / 1000.0
}

/// Helvetica-Bold advance width for a WinAnsi code, in 1/1000 em
fn glyph_width(code: u8) -> u16 {
    match code {
        32..=126 => HELVETICA_BOLD_ASCII[(code - 32) as usize],
        160..=255 => HELVETICA_BOLD_LATIN1[(code - 160) as usize],
        0x80 => 556,  // Euro
        0x82 => 278,  // quotesinglbase
        0x83 => 556,  // florin
        0x84 => 500,  // quotedblbase
        0x85 => 1000, // ellipsis
        0x86 => 556,  // dagger
        0x87 => 556,  // daggerdbl
        0x88 => 333,  // circumflex
        0x89 => 1000, // perthousand
        0x8A => 667,  // Scaron
        0x8B => 333,  // guilsinglleft
        0x8C => 1000, // OE
        0x8E => 611,  // Zcaron
        0x91 | 0x92 => 278,
        0x93 | 0x94 => 500,
        0x95 => 350,  // bullet
        0x96 => 556,  // endash
        0x97 => 1000, // emdash
        0x98 => 333,  // tilde
        0x99 => 1000, // trademark
        0x9A => 556,  // scaron
        0x9B => 333,  // guilsinglright
        0x9C => 944,  // oe
        0x9E => 500,  // zcaron
        0x9F => 667,  // Ydieresis
        _ => 0,
    }
}

/// Helvetica-Bold widths for codes 32..=126
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, // space ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0-7
    556, 556, 333, 333, 584, 584, 584, 611, // 8 9 : ; < = > ?
    975, 722, 722, 722, 722, 667, 611, 778, // @ A-G
    722, 278, 556, 722, 611, 833, 722, 778, // H-O
    667, 778, 722, 667, 611, 722, 667, 944, // P-W
    667, 667, 611, 333, 278, 333, 584, 556, // X Y Z [ \ ] ^ _
    333, 556, 611, 556, 611, 556, 333, 611, // ` a-g
    611, 278, 278, 556, 278, 889, 611, 611, // h-o
    611, 611, 389, 556, 333, 611, 556, 778, // p-w
    556, 556, 500, 389, 280, 389, 584,      // x y z { | } ~
];

/// Helvetica-Bold widths for codes 160..=255
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, // nbsp ¡ ¢ £ ¤ ¥ ¦ §
    333, 737, 370, 556, 584, 333, 737, 333, // ¨ © ª « ¬ soft-hyphen ® ¯
    400, 584, 333, 333, 333, 611, 556, 278, // ° ± ² ³ ´ µ ¶ ·
    333, 333, 365, 556, 834, 834, 834, 611, // ¸ ¹ º » ¼ ½ ¾ ¿
    722, 722, 722, 722, 722, 722, 1000, 722, // À-Å Æ Ç
    667, 667, 667, 667, 278, 278, 278, 278, // È-Ë Ì-Ï
    722, 722, 778, 778, 778, 778, 778, 584, // Ð Ñ Ò-Ö ×
    778, 722, 722, 722, 722, 667, 667, 611, // Ø Ù-Ü Ý Þ ß
    556, 556, 556, 556, 556, 556, 889, 556, // à-å æ ç
    556, 556, 556, 556, 278, 278, 278, 278, // è-ë ì-ï
    611, 611, 611, 611, 611, 611, 611, 584, // ð ñ ò-ö ÷
    611, 611, 611, 611, 611, 556, 611, 556, // ø ù-ü ý þ ÿ
];

/// Escape bytes for a PDF literal string
pub fn escape_pdf_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out
}
