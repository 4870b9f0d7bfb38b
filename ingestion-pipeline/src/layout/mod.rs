//! Layout-aware document text extraction.
//!
//! Per page: prose glyphs are separated from detected table regions,
//! tables are re-rendered as markdown blocks anchored in reading order,
//! boilerplate pages are skipped and trailing administrative sections
//! are cut off. Page texts are concatenated into one document string.

pub mod markdown;
pub mod page;
pub mod pdf;
pub mod tables;

use std::sync::Arc;

use common::error::AppError;
use tracing::debug;

use self::page::{Glyph, PageContent};
use self::pdf::PdfGlyphSource;
use self::tables::TableDetector;

/// Marker lists controlling which pages are skipped outright and where
/// page text is truncated. Matching is literal substring search, so the
/// defaults only fire on Russian-language regulatory documents; other
/// sources can supply their own lists.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// A page containing any of these is dropped entirely (title page,
    /// table of contents).
    pub skip_page_markers: Vec<String>,
    /// Page text is cut at the first occurrence of any of these
    /// (bibliography, editorial credits).
    pub truncate_markers: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            skip_page_markers: vec![
                "Издание официальное".to_string(),
                "Содержание".to_string(),
            ],
            truncate_markers: vec!["Библиография".to_string(), "Редактор".to_string()],
        }
    }
}

/// Extracts clean, layout-ordered text from a document, one page at a
/// time, with detected tables rendered inline as markdown.
pub struct LayoutExtractor {
    config: LayoutConfig,
    detector: Arc<dyn TableDetector>,
}

impl LayoutExtractor {
    pub fn new(detector: Arc<dyn TableDetector>) -> Self {
        Self::with_config(detector, LayoutConfig::default())
    }

    pub fn with_config(detector: Arc<dyn TableDetector>, config: LayoutConfig) -> Self {
        Self { config, detector }
    }

    /// Produces the whole document's text, page texts joined by newline.
    /// Skipped and empty pages contribute nothing.
    pub fn extract_document(&self, source: &PdfGlyphSource) -> Result<String, AppError> {
        let mut all_text = Vec::new();
        for page in source.pages()? {
            if let Some(text) = self.extract_page(&page) {
                all_text.push(text);
            } else {
                debug!(page = page.number, "page skipped during extraction");
            }
        }
        Ok(all_text.join("\n"))
    }

    /// Runs the per-page algorithm. Returns `None` for boilerplate pages
    /// and pages with no extractable text.
    pub fn extract_page(&self, page: &PageContent) -> Option<String> {
        // Defensive normalization: discard anything outside the page box.
        let page = page.crop(page.bbox);

        let full_text = page::extract_text(&page.glyphs);
        if self
            .config
            .skip_page_markers
            .iter()
            .any(|marker| full_text.contains(marker))
        {
            return None;
        }

        let mut glyphs = page.glyphs.clone();
        for table in self.detector.find_tables(&page) {
            if table.grid.is_empty() {
                continue;
            }

            let rendered = markdown::render_table(&table.grid);
            // The anchor comes from the unfiltered page: the first glyph
            // inside the original table region fixes where the rendered
            // block re-enters the reading order.
            let anchor = page
                .crop(table.bbox)
                .glyphs
                .first()
                .map_or(table.bbox, |g| g.bbox);

            // Later tables on the same page filter the already-filtered list.
            glyphs.retain(|g| !g.bbox.overlaps(&table.bbox));

            if let Some(text) = rendered {
                glyphs.push(Glyph::new(text, anchor));
            }
        }

        let mut text = page::extract_text(&glyphs);
        for marker in &self.config.truncate_markers {
            if let Some(index) = text.find(marker) {
                text.truncate(index);
            }
        }

        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}
