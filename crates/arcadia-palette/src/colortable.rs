//! Indirection from lookup indices to pens.
//!
//! Tilemap and sprite hardware usually select colors through a lookup PROM
//! rather than by pen number. A [`ColorTable`] models that PROM: a fixed
//! number of entries, each naming the pen it resolves to.

use crate::error::PaletteError;

/// Lookup index to pen mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<u32>,
    pens: usize,
}

impl ColorTable {
    /// Creates a table of `length` entries over `pens` pens, entry `i`
    /// initially resolving to pen `i % pens`.
    pub fn new(length: usize, pens: usize) -> Self {
        let entries = (0..length)
            .map(|i| if pens == 0 { 0 } else { (i % pens) as u32 })
            .collect();
        Self { entries, pens }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pen that entry `index` resolves to.
    pub fn pen_for(&self, index: usize) -> Option<u32> {
        self.entries.get(index).copied()
    }

    /// All entries.
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    /// Points entry `index` at `pen`.
    pub fn set_entry(&mut self, index: usize, pen: u32) -> Result<(), PaletteError> {
        let length = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(PaletteError::EntryOutOfRange { index, length })?;
        if pen as usize >= self.pens {
            return Err(PaletteError::PenOutOfRange {
                pen: pen as usize,
                total: self.pens,
            });
        }
        *slot = pen;
        Ok(())
    }
}
