//! Fixed-window pre-chunking.
//!
//! A cheap, geometry-free first pass: the document text is cut into
//! overlapping character windows. Window boundaries are allowed to split
//! sentences; the semantic merger repairs those splits later.

use common::error::AppError;

use crate::types::RawFragment;

/// Splits `text` into windows of `window` characters advancing by
/// `window - overlap`. A window shorter than `window` is only kept when
/// it is also the first one, i.e. the whole document fits in one window.
/// Windows are whitespace-trimmed; empty results are dropped.
///
/// Offsets are counted in characters, not bytes, so Cyrillic text never
/// splits inside a code point.
pub fn split_fixed_windows(
    text: &str,
    source: &str,
    category: &str,
    window: usize,
    overlap: usize,
) -> Result<Vec<RawFragment>, AppError> {
    if window == 0 {
        return Err(AppError::Validation(
            "window size must be positive".to_string(),
        ));
    }
    if overlap >= window {
        return Err(AppError::Validation(format!(
            "overlap {overlap} must be smaller than window size {window}"
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let step = window - overlap;
    let mut fragments = Vec::new();

    let mut start = 0;
    while start < chars.len() {
        let end = (start + window).min(chars.len());
        if end - start < window && start > 0 {
            break;
        }

        let raw: String = chars[start..end].iter().collect();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            fragments.push(RawFragment::new(
                trimmed.to_string(),
                source,
                category,
                start,
            ));
        }
        start += step;
    }

    Ok(fragments)
}
