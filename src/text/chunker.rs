//! Fixed-size text chunking
//!
//! Splits input text into fixed-length character slices so each synthesis
//! call sees a bounded amount of text regardless of total document length.
//! Boundaries are purely positional; a chunk may split a word or sentence.
//! That trade-off keeps the chunker total and deterministic: concatenating
//! the chunks in order always reproduces the input exactly.

/// Default maximum characters per chunk
pub const DEFAULT_MAX_CHARS: usize = 500;

/// An ordered, size-bounded slice of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position in the chunk sequence, starting at 0
    pub index: usize,
    /// Chunk text
    pub text: String,
}

impl TextChunk {
    /// Whether the chunk contains only whitespace (or nothing).
    /// Blank chunks are produced by the chunker but never synthesized.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Splits on `char` boundaries, so multi-byte text never produces invalid
/// slices. The final chunk may be shorter. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(TextChunk {
                index: chunks.len(),
                text: std::mem::take(&mut current),
            });
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(TextChunk {
            index: chunks.len(),
            text: current,
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("Hello world.", 500);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].text, "Hello world.");
    }

    #[test]
    fn test_exact_lengths() {
        let text = "a".repeat(1200);
        let chunks = chunk_text(&text, 500);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text.len(), 500);
        assert_eq!(chunks[1].text.len(), 500);
        assert_eq!(chunks[2].text.len(), 200);
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(37);
        let chunks = chunk_text(&text, 64);
        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let text = "héllo wörld ünïcode ".repeat(40);
        let chunks = chunk_text(&text, 7);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 7);
        }
        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_indices_are_sequential() {
        let chunks = chunk_text(&"x".repeat(50), 10);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk_text("", 500).is_empty());
    }

    #[test]
    fn test_whitespace_chunks_are_blank() {
        let chunks = chunk_text("     \n\t   ", 4);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.is_blank()));
    }
}
