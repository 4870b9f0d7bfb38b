//! In-memory page model: positioned glyph records and detected table
//! regions, plus layout-preserving text reconstruction.

use crate::geometry::BBox;

/// Glyphs whose vertical centers differ by less than this are treated as
/// belonging to the same text line.
const Y_TOLERANCE: f64 = 3.0;
/// A horizontal gap wider than this between neighbouring glyphs becomes a
/// word separator during reconstruction.
const X_TOLERANCE: f64 = 3.0;

/// One positioned character record. Normally holds a single character;
/// a synthetic glyph carrying a rendered table holds the whole block.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub bbox: BBox,
}

impl Glyph {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A detected table: its bounding box plus the extracted 2-D cell grid.
/// `None` cells are rendered as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    pub bbox: BBox,
    pub grid: Vec<Vec<Option<String>>>,
}

/// One page of a document, scoped to a single ingestion pass.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number as reported by the document.
    pub number: u32,
    pub bbox: BBox,
    pub glyphs: Vec<Glyph>,
}

impl PageContent {
    pub fn new(number: u32, bbox: BBox, glyphs: Vec<Glyph>) -> Self {
        Self {
            number,
            bbox,
            glyphs,
        }
    }

    /// Returns a copy keeping only glyphs whose centers fall inside `bbox`.
    pub fn crop(&self, bbox: BBox) -> PageContent {
        let glyphs = self
            .glyphs
            .iter()
            .filter(|g| {
                let (cx, cy) = g.bbox.center();
                bbox.contains_point(cx, cy)
            })
            .cloned()
            .collect();
        PageContent::new(self.number, bbox, glyphs)
    }
}

/// Reassembles glyphs into text in reading order: glyphs are clustered
/// into lines by vertical center, each line is sorted left to right, and
/// horizontal gaps wider than the tolerance become single spaces. Lines
/// are joined with newlines so rows and columns do not interleave.
pub fn extract_text(glyphs: &[Glyph]) -> String {
    if glyphs.is_empty() {
        return String::new();
    }

    let mut ordered: Vec<&Glyph> = glyphs.iter().collect();
    ordered.sort_by(|a, b| {
        let (_, ay) = a.bbox.center();
        let (_, by) = b.bbox.center();
        ay.partial_cmp(&by)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.bbox
                    .x0
                    .partial_cmp(&b.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let mut lines: Vec<Vec<&Glyph>> = Vec::new();
    let mut current_y = f64::NEG_INFINITY;
    for glyph in ordered {
        let (_, cy) = glyph.bbox.center();
        if lines.is_empty() || (cy - current_y).abs() > Y_TOLERANCE {
            lines.push(Vec::new());
            current_y = cy;
        }
        if let Some(line) = lines.last_mut() {
            line.push(glyph);
        }
    }

    let mut rendered_lines = Vec::with_capacity(lines.len());
    for mut line in lines {
        line.sort_by(|a, b| {
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut text = String::new();
        let mut previous_x1: Option<f64> = None;
        for glyph in line {
            if let Some(x1) = previous_x1 {
                if glyph.bbox.x0 - x1 > X_TOLERANCE && !text.ends_with(char::is_whitespace) {
                    text.push(' ');
                }
            }
            text.push_str(&glyph.text);
            previous_x1 = Some(glyph.bbox.x1);
        }
        rendered_lines.push(text);
    }

    rendered_lines.join("\n")
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{BBox, Glyph};

    pub(crate) fn make_glyph(text: &str, x0: f64, top: f64) -> Glyph {
        Glyph::new(text, BBox::new(x0, top, x0 + 10.0, top + 12.0))
    }

    /// Lays out `text` as glyphs starting at (x0, top): characters are
    /// 10pt wide and abut; a space adds an 8pt gap instead of a glyph.
    pub(crate) fn glyphs_for(text: &str, x0: f64, top: f64) -> Vec<Glyph> {
        let mut glyphs = Vec::new();
        let mut x = x0;
        for ch in text.chars() {
            if ch == ' ' {
                x += 8.0;
            } else {
                glyphs.push(make_glyph(&ch.to_string(), x, top));
                x += 10.0;
            }
        }
        glyphs
    }
}
