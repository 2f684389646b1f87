//! Shadow and highlight lookup tables.
//!
//! Sprite hardware often darkens or lightens whatever is underneath a
//! sprite instead of drawing it. Renderers implement that by passing the
//! background pixel through one of four preset tables:
//!
//! - In indexed formats a table maps a base pen to its shadow pen
//!   (`pen + N`) or highlight pen (`pen + 2N`); every other pen maps to
//!   itself.
//! - In direct formats a table has one entry per 5-5-5 color and holds the
//!   darkened or lightened pixel in the display format.

use crate::color::{Rgb, scale_channel};
use crate::format::DisplayFormat;

/// Number of shadow presets.
pub const SHADOW_PRESETS: usize = 4;

/// Entries in a direct-format table, one per 5-5-5 color.
pub const DIRECT_TABLE_SIZE: usize = 1 << 15;

/// Largest per-channel delta accepted by [`ShadowConfig::Delta`].
pub const MAX_DELTA: i16 = 255;

/// How a shadow table was generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowConfig {
    /// Every value maps to itself.
    Identity,
    /// Base pens map to `pen + offset` (indexed formats).
    PenOffset(usize),
    /// Channels are scaled by an 8-bit fixed-point factor (direct formats).
    Scale(u16),
    /// Channels are offset by signed deltas (direct formats).
    Delta {
        /// Red delta.
        dr: i16,
        /// Green delta.
        dg: i16,
        /// Blue delta.
        db: i16,
        /// Wrap around at 0/255 instead of clamping.
        noclip: bool,
    },
}

impl ShadowConfig {
    /// Builds a delta configuration, clamping each delta to `±255`.
    pub fn delta(dr: i32, dg: i32, db: i32, noclip: bool) -> Self {
        let clamp = |d: i32| d.clamp(-i32::from(MAX_DELTA), i32::from(MAX_DELTA)) as i16;
        Self::Delta {
            dr: clamp(dr),
            dg: clamp(dg),
            db: clamp(db),
            noclip,
        }
    }

    /// Transforms one color according to this configuration.
    pub fn apply(self, color: Rgb) -> Rgb {
        match self {
            Self::Identity | Self::PenOffset(_) => color,
            Self::Scale(factor) => color.map(|c| scale_channel(c, u32::from(factor))),
            Self::Delta { dr, dg, db, noclip } => {
                let shift = |c: u8, d: i16| {
                    let v = i16::from(c) + d;
                    if noclip {
                        (v & 0xff) as u8
                    } else {
                        v.clamp(0, 0xff) as u8
                    }
                };
                Rgb::new(shift(color.r, dr), shift(color.g, dg), shift(color.b, db))
            }
        }
    }
}

/// One preset lookup table.
#[derive(Debug, Clone)]
pub struct ShadowTable {
    config: ShadowConfig,
    entries: Vec<u32>,
    regenerations: u32,
}

impl ShadowTable {
    pub(crate) fn new() -> Self {
        Self {
            config: ShadowConfig::Identity,
            entries: Vec::new(),
            regenerations: 0,
        }
    }

    /// Configuration the entries were generated from.
    pub fn config(&self) -> ShadowConfig {
        self.config
    }

    /// The lookup entries.
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    /// Looks up one value; values beyond the table map to themselves.
    pub fn map(&self, value: u32) -> u32 {
        self.entries.get(value as usize).copied().unwrap_or(value)
    }

    /// How many times the entries have been generated.
    pub fn regenerations(&self) -> u32 {
        self.regenerations
    }

    /// Regenerates an indexed table covering `pens` pens, of which the first
    /// `base` are base pens.
    pub(crate) fn build_indexed(&mut self, config: ShadowConfig, pens: usize, base: usize) {
        let offset = match config {
            ShadowConfig::PenOffset(offset) => offset,
            _ => 0,
        };
        self.entries.clear();
        self.entries.extend((0..pens).map(|pen| {
            if pen < base && pen + offset < pens {
                (pen + offset) as u32
            } else {
                pen as u32
            }
        }));
        self.finish(config);
    }

    /// Regenerates a direct table in `format`.
    pub(crate) fn build_direct(&mut self, config: ShadowConfig, format: DisplayFormat) {
        self.entries.clear();
        self.entries.extend((0..DIRECT_TABLE_SIZE).map(|value| {
            let color = config.apply(Rgb::from_rgb555(value as u16));
            format.pen_value(value, color)
        }));
        self.finish(config);
    }

    fn finish(&mut self, config: ShadowConfig) {
        self.config = config;
        self.regenerations += 1;
        tracing::trace!(
            "shadow_build: {config:?} ({} entries, build #{})",
            self.entries.len(),
            self.regenerations
        );
    }
}
