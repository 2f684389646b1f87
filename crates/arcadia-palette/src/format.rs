//! Display pixel formats.

use crate::color::Rgb;

/// How the presentation layer consumes pens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayFormat {
    /// Pixels are pen indices; the presentation layer resolves them and is
    /// told about every color change.
    #[default]
    Indexed,
    /// Pixels are 5-5-5 RGB values.
    Direct15,
    /// Pixels are `0xRRGGBB` values.
    Direct32,
}

impl DisplayFormat {
    /// Whether pens are resolved by the presentation layer.
    pub fn is_indexed(self) -> bool {
        self == Self::Indexed
    }

    /// Hardware value stored for `pen` when its adjusted color is `color`.
    pub fn pen_value(self, pen: usize, color: Rgb) -> u32 {
        match self {
            Self::Indexed => pen as u32,
            Self::Direct15 => u32::from(color.to_rgb555()),
            Self::Direct32 => color.to_u32(),
        }
    }
}

impl core::fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Indexed => "indexed",
            Self::Direct15 => "rgb15",
            Self::Direct32 => "rgb32",
        })
    }
}
