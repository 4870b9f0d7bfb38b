mod chunk;
mod fragment;

pub use chunk::Chunk;
pub use fragment::RawFragment;
