/// Splits document text into overlapping fixed-size windows.
///
/// Windows are measured in characters, not bytes, so multi-byte input never
/// splits a code point. A window that reaches the end of the text is the last
/// chunk; otherwise the next window starts `chunk_size - chunk_overlap`
/// characters after the previous one.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// # Panics
    ///
    /// Panics when `chunk_overlap >= chunk_size`; callers validate
    /// configuration before constructing (see `RagConfig::validate`).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(
            chunk_overlap < chunk_size,
            "chunk overlap must be strictly less than chunk size"
        );
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split `text` into chunks. Empty input yields no chunks; any other
    /// input yields at least one. Pure and deterministic.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if start + self.chunk_size >= chars.len() {
                break;
            }
            start += self.chunk_size - self.chunk_overlap;
        }

        chunks
    }
}
