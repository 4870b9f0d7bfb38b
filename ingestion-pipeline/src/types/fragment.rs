use serde::{Deserialize, Serialize};

/// A raw fixed-window span of document text, produced before semantic
/// merging. Window boundaries are allowed to split sentences; the merger
/// repairs that later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFragment {
    pub text: String,
    /// Filename of the originating document.
    pub source: String,
    /// Category label derived from the directory the document lives in.
    pub category: String,
    /// Character offset of the window start within the document text.
    pub offset: usize,
}

impl RawFragment {
    pub fn new(text: String, source: &str, category: &str, offset: usize) -> Self {
        Self {
            text,
            source: source.to_string(),
            category: category.to_string(),
            offset,
        }
    }
}
