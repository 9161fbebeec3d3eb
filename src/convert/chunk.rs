//! Text chunking for long text atoms.

/// Chunking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Whether long text atoms are split into quarks
    pub enabled: bool,

    /// Maximum characters per chunk; also the threshold for chunking
    pub max_length: usize,

    /// Minimum characters the window advances between chunks
    pub shift_size: usize,

    /// Maximum words per chunk
    pub max_words: usize,
}

impl ChunkOptions {
    /// Enabled chunking with the given window size.
    pub fn sliding(max_length: usize, shift_size: usize) -> Self {
        Self {
            enabled: true,
            max_length,
            shift_size,
            ..Self::default()
        }
    }

    /// Set the word limit.
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    /// Whether text of this many characters should be chunked.
    pub fn applies_to(&self, char_count: usize) -> bool {
        self.enabled && self.max_length > 0 && char_count > self.max_length
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            max_length: 1000,
            shift_size: 500,
            max_words: 200,
        }
    }
}

/// Splits text into chunks.
pub trait TextChunker: Send + Sync {
    /// Split `text` into chunks in reading order.
    fn chunk(&self, text: &str, options: &ChunkOptions) -> Vec<String>;
}

/// Overlapping word windows.
///
/// Each window holds whole words and stays within `max_length` characters
/// and `max_words` words. The next window starts at the first word at least
/// `shift_size` characters after the current start. A single word longer
/// than `max_length` forms its own window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlidingWindowChunker;

impl TextChunker for SlidingWindowChunker {
    fn chunk(&self, text: &str, options: &ChunkOptions) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }
        let max_words = options.max_words.max(1);
        let shift = options.shift_size.max(1);

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let mut end = start;
            let mut len = 0;
            while end < words.len() && end - start < max_words {
                let word_len = words[end].chars().count();
                let added = if end == start { word_len } else { word_len + 1 };
                if end > start && len + added > options.max_length {
                    break;
                }
                len += added;
                end += 1;
            }
            chunks.push(words[start..end].join(" "));
            if end >= words.len() {
                break;
            }

            let mut advanced = 0;
            let mut next = start;
            while next < end && advanced < shift {
                advanced += words[next].chars().count() + 1;
                next += 1;
            }
            start = next.max(start + 1);
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disabled() {
        let options = ChunkOptions::default();
        assert!(!options.enabled);
        assert!(!options.applies_to(10_000));
        assert!(ChunkOptions::sliding(10, 5).applies_to(11));
        assert!(!ChunkOptions::sliding(10, 5).applies_to(10));
    }

    #[test]
    fn test_windows_overlap_and_cover_text() {
        let options = ChunkOptions::sliding(11, 4);
        let chunks = SlidingWindowChunker.chunk("one two three four five", &options);
        assert_eq!(chunks, vec!["one two", "two three", "three four", "four five"]);
    }

    #[test]
    fn test_word_limit() {
        let options = ChunkOptions::sliding(1000, 1).with_max_words(2);
        let chunks = SlidingWindowChunker.chunk("a b c", &options);
        assert_eq!(chunks, vec!["a b", "b c"]);
    }

    #[test]
    fn test_oversized_word_is_own_chunk() {
        let options = ChunkOptions::sliding(4, 4);
        let chunks = SlidingWindowChunker.chunk("abcdefgh ij", &options);
        assert_eq!(chunks, vec!["abcdefgh", "ij"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(SlidingWindowChunker
            .chunk("   ", &ChunkOptions::sliding(10, 5))
            .is_empty());
    }
}
