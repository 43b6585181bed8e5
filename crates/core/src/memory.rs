//! Flat main memory.
//!
//! One [`Word`] per address. Cell `i` starts out holding the value `i`, so a freshly
//! fetched block shows where it came from.

use serde::Serialize;

use crate::common::Word;

/// Main memory backing the cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MainMemory {
    cells: Vec<Word>,
}

impl MainMemory {
    /// Creates a memory of `size` cells, each initialised to its own address.
    pub fn new(size: usize) -> Self {
        Self {
            cells: (0..size as Word).collect(),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the memory has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads the cell at `address`, or `None` if it is out of range.
    pub fn read(&self, address: u64) -> Option<Word> {
        usize::try_from(address)
            .ok()
            .and_then(|a| self.cells.get(a))
            .copied()
    }

    /// Writes `value` to `address`.
    ///
    /// Returns `false` (and leaves memory unchanged) if `address` is out of range.
    pub fn write(&mut self, address: u64, value: Word) -> bool {
        match usize::try_from(address)
            .ok()
            .and_then(|a| self.cells.get_mut(a))
        {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// All cells, in address order.
    pub fn cells(&self) -> &[Word] {
        &self.cells
    }
}
