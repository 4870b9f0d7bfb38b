//! Canonical token counting for the chunk size ceiling.

use std::path::Path;

use common::error::AppError;
use tokenizers::Tokenizer;

/// Length-in-tokens authority used by the merger. Implementations must be
/// deterministic: the same text always yields the same count.
pub trait CountTokens: Send + Sync {
    fn count(&self, text: &str) -> Result<usize, AppError>;
}

/// Subword token counter over a pretrained multilingual tokenizer.
/// Loaded once per process and shared read-only.
pub struct TokenCounter {
    tokenizer: Tokenizer,
}

impl TokenCounter {
    /// Loads a tokenizer definition from a local `tokenizer.json`.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|err| AppError::Tokenizer(format!("failed to load tokenizer: {err}")))?;
        Ok(Self { tokenizer })
    }

    /// Fetches a tokenizer from the Hugging Face hub by model id.
    pub fn from_pretrained(identifier: &str) -> Result<Self, AppError> {
        let tokenizer = Tokenizer::from_pretrained(identifier, None).map_err(|err| {
            AppError::Tokenizer(format!("failed to fetch tokenizer {identifier}: {err}"))
        })?;
        Ok(Self { tokenizer })
    }
}

impl CountTokens for TokenCounter {
    fn count(&self, text: &str) -> Result<usize, AppError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|err| AppError::Tokenizer(format!("failed to encode text: {err}")))?;
        Ok(encoding.get_ids().len())
    }
}
