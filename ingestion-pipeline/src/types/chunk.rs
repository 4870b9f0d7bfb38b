use serde::{Deserialize, Serialize};

/// The final, semantically merged, size-bounded unit handed to the
/// embedding and indexing collaborators. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: String,
    pub category: String,
    /// 0-based ordinal within the owning document.
    pub chunk_index: usize,
}

impl Chunk {
    /// Stable identifier used by the indexing layer.
    pub fn id(&self) -> String {
        format!("{}_{}", self.source, self.chunk_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_combines_source_and_index() {
        let chunk = Chunk {
            text: "text".into(),
            source: "gost-123.pdf".into(),
            category: "water".into(),
            chunk_index: 4,
        };
        assert_eq!(chunk.id(), "gost-123.pdf_4");
    }
}
