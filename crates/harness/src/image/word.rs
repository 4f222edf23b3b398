//! Contiguous 32-bit word image.

use std::fmt::Write as _;

use super::memory::MemoryImage;

/// An ordered, gap-free sequence of 32-bit words covering `0..=max_addr / 4`.
///
/// Each word is packed little-endian from four consecutive byte addresses
/// (`base + 0` is the least-significant byte); bytes never written default
/// to 0. Rendered as `$readmemh` input: one word per line, exactly eight
/// lowercase hex digits, no separators and no header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordImage {
    words: Vec<u32>,
}

impl WordImage {
    /// Packs a sparse byte image into a contiguous word image.
    ///
    /// An empty byte image yields an empty word image (zero lines), not an
    /// error. Otherwise every word index up to `max_address / 4` is present,
    /// even if none of its four bytes were written.
    pub fn from_memory(mem: &MemoryImage) -> Self {
        let Some(max_addr) = mem.max_address() else {
            return Self::default();
        };

        let max_word_idx = max_addr / 4;
        // The capacity is a hint; a count too large for the platform's
        // usize must not panic here.
        let capacity = usize::try_from(max_word_idx + 1).unwrap_or(0);
        let mut words = Vec::with_capacity(capacity);
        for idx in 0..=max_word_idx {
            let base = idx * 4;
            let word = u32::from_le_bytes([
                mem.read(base),
                mem.read(base + 1),
                mem.read(base + 2),
                mem.read(base + 3),
            ]);
            words.push(word);
        }
        Self { words }
    }

    /// The packed words, in index order.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Number of words (output lines).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the image renders to zero lines.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Renders the image as word-hex text.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.words.len() * 9);
        for word in &self.words {
            // Infallible: writing to a String cannot fail.
            let _ = writeln!(out, "{word:08x}");
        }
        out
    }
}
