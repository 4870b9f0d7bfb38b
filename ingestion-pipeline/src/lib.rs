#![allow(clippy::missing_docs_in_private_items)]

pub mod chunking;
pub mod geometry;
pub mod layout;
pub mod pipeline;
pub mod types;

pub use pipeline::{ChunkingParams, IngestionPipeline};
pub use types::{Chunk, RawFragment};
