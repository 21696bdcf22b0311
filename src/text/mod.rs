//! Text preparation for synthesis

pub mod chunker;

pub use chunker::{chunk_text, TextChunk, DEFAULT_MAX_CHARS};
