//! Arcadia Palette - pen colors for machine emulation
//!
//! Video hardware draws with pens: logical color indices whose RGB value the
//! driver sets and changes at run time. This crate owns that mapping for a
//! running machine and keeps the color the driver set, the brightness- and
//! gamma-corrected color, and the value the display consumes consistent.
//!
//! # Core Abstractions
//!
//! - [`Palette`] - raw, adjusted and hardware pen tables with change
//!   notification
//! - [`PaletteLayout`] - base color count, display format, shadow and
//!   highlight pens
//! - [`ShadowTable`] - the four preset translucency lookup tables
//! - [`ColorTable`] - lookup index to pen indirection
//! - [`Correction`] - global gamma and brightness curve
//!
//! # Fixed Point
//!
//! Per-pen brightness and the shadow/highlight factors carry
//! [`BRIGHTNESS_BITS`](color::BRIGHTNESS_BITS) fractional bits and saturate
//! at 4.0. Channel arithmetic truncates and saturates at 255.

pub mod color;
pub mod colortable;
pub mod correction;
pub mod error;
pub mod format;
pub mod palette;
pub mod shadow;

pub use color::Rgb;
pub use colortable::ColorTable;
pub use correction::Correction;
pub use error::{MAX_COLORS, PaletteError};
pub use format::DisplayFormat;
pub use palette::{
    ChangeNotifier, DEFAULT_HIGHLIGHT_FACTOR, DEFAULT_SHADOW_FACTOR, Palette, PaletteLayout,
};
pub use shadow::{DIRECT_TABLE_SIZE, SHADOW_PRESETS, ShadowConfig, ShadowTable};
