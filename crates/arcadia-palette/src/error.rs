//! Error types for palette setup and mutation.

use thiserror::Error;

/// Largest number of usable pens; two more are reserved for UI black/white.
pub const MAX_COLORS: usize = 65534;

/// Palette configuration errors.
///
/// These indicate a driver bug; the palette is left unchanged when one is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// A mutating call named a pen beyond the palette.
    #[error("pen {pen} out of range (palette has {total} pens)")]
    PenOutOfRange {
        /// Requested pen.
        pen: usize,
        /// Pens in the palette.
        total: usize,
    },

    /// A color table index beyond the table length.
    #[error("color table entry {index} out of range (table has {length} entries)")]
    EntryOutOfRange {
        /// Requested entry.
        index: usize,
        /// Table length.
        length: usize,
    },

    /// Change notifiers may only be registered while the machine initializes.
    #[error("change notifiers must be registered during machine initialization")]
    NotifierAfterInit,

    /// The expanded palette would not fit below the UI pens.
    #[error("palette needs {requested} pens, at most {max} are available", max = MAX_COLORS)]
    TooManyColors {
        /// Pens the layout asked for, after shadow/highlight expansion.
        requested: usize,
    },

    /// Shadow presets are numbered 0 to 3.
    #[error("shadow preset {0} does not exist (valid presets are 0-3)")]
    InvalidPreset(usize),
}
