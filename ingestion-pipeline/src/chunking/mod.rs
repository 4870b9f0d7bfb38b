//! Two-stage chunking: cheap fixed windows, then classifier-gated merging.

pub mod classifier;
pub mod merger;
pub mod splitter;
pub mod token_count;

pub use classifier::{SameUnitClassifier, ZeroShotNliClassifier};
pub use merger::SemanticMerger;
pub use splitter::split_fixed_windows;
pub use token_count::{CountTokens, TokenCounter};
