//! Sparse byte-addressed memory image.

use std::collections::BTreeMap;

use tracing::debug;

/// A sparse mapping from byte address to 8-bit value, plus a write cursor.
///
/// Built incrementally while scanning an image description. Addresses are
/// unbounded; storage is owned and never shared with another image. A later
/// write to an already-written address overwrites it — last write wins, in
/// write order, matching the behavior the simulator toolflow has always had.
#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    cells: BTreeMap<u64, u8>,
    cursor: u64,
}

impl MemoryImage {
    /// Creates an empty image with the cursor at address 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the write cursor to an absolute byte address.
    pub fn set_cursor(&mut self, addr: u64) {
        self.cursor = addr;
    }

    /// Current write cursor.
    #[inline]
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Writes one byte at the cursor and advances the cursor by one.
    pub fn push(&mut self, value: u8) {
        if let Some(prev) = self.cells.insert(self.cursor, value) {
            debug!(
                addr = self.cursor,
                prev,
                value,
                "overwriting previously written byte"
            );
        }
        self.cursor += 1;
    }

    /// Reads the byte at `addr`, defaulting to 0 for addresses never written.
    #[inline]
    pub fn read(&self, addr: u64) -> u8 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    /// Highest address ever written, or `None` for an empty image.
    pub fn max_address(&self) -> Option<u64> {
        self.cells.keys().next_back().copied()
    }

    /// True if no byte was ever written.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of distinct addresses written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}
