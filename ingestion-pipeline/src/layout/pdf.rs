//! Glyph extraction from PDF content streams.
//!
//! Walks each page's decoded content stream and records one positioned
//! glyph per shown character, converting PDF bottom-left coordinates to
//! the top-origin page space used by the rest of the layout code. Text
//! bytes are decoded through the current font's declared encoding, the
//! same way lopdf's own plain-text extraction resolves them. Glyph
//! advances are approximated from the active font size; the resulting
//! boxes are good enough for reading-order reconstruction and region
//! overlap tests, which is all the pipeline needs.

use common::error::AppError;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::geometry::BBox;

use super::page::{Glyph, PageContent};

/// Fraction of the font size used as the horizontal advance per glyph.
const GLYPH_ADVANCE_RATIO: f64 = 0.5;

/// A loaded PDF document exposing its pages as positioned glyph records.
#[derive(Debug)]
pub struct PdfGlyphSource {
    doc: Document,
}

impl PdfGlyphSource {
    pub fn load(bytes: &[u8]) -> Result<Self, AppError> {
        let doc = Document::load_mem(bytes)
            .map_err(|err| AppError::Extraction(format!("failed to parse PDF: {err}")))?;
        Ok(Self { doc })
    }

    /// Extracts every page in document order. A page whose content stream
    /// cannot be decoded fails the whole document; partial pages would
    /// silently corrupt chunk boundaries downstream.
    pub fn pages(&self) -> Result<Vec<PageContent>, AppError> {
        let mut pages = Vec::new();
        for (number, page_id) in self.doc.get_pages() {
            pages.push(self.page(number, page_id)?);
        }
        Ok(pages)
    }

    fn page(&self, number: u32, page_id: ObjectId) -> Result<PageContent, AppError> {
        let media_box = self.media_box(page_id);
        let [llx, lly, urx, ury] = media_box;
        let page_bbox = BBox::new(llx, 0.0, urx, ury - lly);

        let fonts = self.doc.get_page_fonts(page_id);
        let data = self.doc.get_page_content(page_id)?;
        let content = Content::decode(&data)?;

        let mut glyphs = Vec::new();
        let mut encoding: Option<&str> = None;
        let mut size = 0.0_f64;
        let mut leading = 0.0_f64;
        let (mut line_x, mut line_y) = (0.0_f64, 0.0_f64);
        let (mut x, mut y) = (0.0_f64, 0.0_f64);

        for operation in &content.operations {
            match operation.operator.as_str() {
                "BT" => {
                    line_x = 0.0;
                    line_y = 0.0;
                    x = 0.0;
                    y = 0.0;
                }
                "Tf" => {
                    if let Some(name) = operation.operands.first().and_then(|o| o.as_name().ok()) {
                        encoding = fonts.get(name).map(|font| font.get_font_encoding());
                    }
                    if let Some(value) = operation.operands.get(1).and_then(self::number) {
                        size = value;
                    }
                }
                "TL" => {
                    if let Some(value) = operation.operands.first().and_then(self::number) {
                        leading = value;
                    }
                }
                "Td" | "TD" => {
                    let tx = operation.operands.first().and_then(self::number).unwrap_or(0.0);
                    let ty = operation.operands.get(1).and_then(self::number).unwrap_or(0.0);
                    if operation.operator == "TD" {
                        leading = -ty;
                    }
                    line_x += tx;
                    line_y += ty;
                    x = line_x;
                    y = line_y;
                }
                "Tm" => {
                    line_x = operation.operands.get(4).and_then(self::number).unwrap_or(0.0);
                    line_y = operation.operands.get(5).and_then(self::number).unwrap_or(0.0);
                    x = line_x;
                    y = line_y;
                }
                "T*" => {
                    line_y -= leading;
                    x = line_x;
                    y = line_y;
                }
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operation.operands.first() {
                        show_text(&mut glyphs, &mut x, y, ury, size, encoding, bytes);
                    }
                }
                "'" | "\"" => {
                    line_y -= leading;
                    x = line_x;
                    y = line_y;
                    if let Some(Object::String(bytes, _)) = operation.operands.last() {
                        show_text(&mut glyphs, &mut x, y, ury, size, encoding, bytes);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operation.operands.first() {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    show_text(&mut glyphs, &mut x, y, ury, size, encoding, bytes);
                                }
                                other => {
                                    if let Some(adjust) = self::number(other) {
                                        x -= adjust / 1000.0 * size;
                                    }
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(PageContent::new(number, page_bbox, glyphs))
    }

    /// Resolves the page MediaBox, walking up the page tree for inherited
    /// values. Falls back to US Letter when nothing is declared.
    fn media_box(&self, page_id: ObjectId) -> [f64; 4] {
        let mut current = Some(page_id);
        while let Some(id) = current {
            let Ok(dict) = self.doc.get_object(id).and_then(Object::as_dict) else {
                break;
            };
            if let Some(values) = dict.get(b"MediaBox").ok().and_then(|obj| self.rect(obj)) {
                return values;
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .ok();
        }
        [0.0, 0.0, 612.0, 792.0]
    }

    fn rect(&self, obj: &Object) -> Option<[f64; 4]> {
        let resolved = match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        let Object::Array(items) = resolved else {
            return None;
        };
        if items.len() != 4 {
            return None;
        }
        let mut rect = [0.0; 4];
        for (slot, item) in rect.iter_mut().zip(items) {
            *slot = number(item)?;
        }
        Some(rect)
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Emits one glyph per visible character, advancing the cursor for every
/// character including whitespace. Whitespace itself is not recorded;
/// reconstruction reintroduces separators from the horizontal gaps.
fn show_text(
    glyphs: &mut Vec<Glyph>,
    x: &mut f64,
    y: f64,
    ury: f64,
    size: f64,
    encoding: Option<&str>,
    bytes: &[u8],
) {
    let decoded = Document::decode_text(encoding, bytes);
    let advance = size * GLYPH_ADVANCE_RATIO;
    for ch in decoded.chars() {
        if !ch.is_whitespace() {
            let bbox = BBox::new(*x, ury - y - size, *x + advance, ury - y);
            glyphs.push(Glyph::new(ch.to_string(), bbox));
        }
        *x += advance;
    }
}
