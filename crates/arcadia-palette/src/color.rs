//! RGB triples, packed pixel formats and 8-bit fixed-point brightness.

/// Fractional bits of a brightness or shadow factor.
pub const BRIGHTNESS_BITS: u32 = 8;

/// Brightness of 1.0.
pub const BRIGHTNESS_UNITY: u16 = 1 << BRIGHTNESS_BITS;

/// Largest accepted brightness (4.0).
pub const BRIGHTNESS_MAX: u16 = BRIGHTNESS_UNITY * 4;

/// An 8-bit-per-channel color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs as `0xRRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Packs as 5-5-5 RGB, dropping the low three bits of each channel.
    pub const fn to_rgb555(self) -> u16 {
        (((self.r as u16) >> 3) << 10) | (((self.g as u16) >> 3) << 5) | ((self.b as u16) >> 3)
    }

    /// Expands a 5-5-5 value, replicating the top bits into the low bits so
    /// that `0x1f` maps to `0xff`.
    pub const fn from_rgb555(value: u16) -> Self {
        Self::new(
            expand_5bit((value >> 10) as u8),
            expand_5bit((value >> 5) as u8),
            expand_5bit(value as u8),
        )
    }

    /// Applies `f` to each channel.
    #[must_use]
    pub fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl From<u32> for Rgb {
    /// Unpacks `0xRRGGBB`; the top byte is ignored.
    fn from(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

impl From<Rgb> for u32 {
    fn from(color: Rgb) -> Self {
        color.to_u32()
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl core::fmt::Display for Rgb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{:06x}", self.to_u32())
    }
}

/// Expands a 5-bit channel to 8 bits.
#[inline]
pub const fn expand_5bit(value: u8) -> u8 {
    let v = value & 0x1f;
    (v << 3) | (v >> 2)
}

/// Converts a linear brightness factor to 8-bit fixed point.
///
/// Negative and non-finite values become zero; values above 4.0 saturate.
pub fn brightness_from_f32(factor: f32) -> u16 {
    if !factor.is_finite() || factor <= 0.0 {
        return 0;
    }
    let scaled = factor * f32::from(BRIGHTNESS_UNITY);
    if scaled >= f32::from(BRIGHTNESS_MAX) {
        BRIGHTNESS_MAX
    } else {
        scaled as u16
    }
}

/// Converts a fixed-point brightness back to floating point.
#[inline]
pub fn brightness_to_f32(factor: u16) -> f32 {
    f32::from(factor) / f32::from(BRIGHTNESS_UNITY)
}

/// Multiplies two fixed-point factors.
#[inline]
pub fn combine_factors(a: u16, b: u16) -> u32 {
    (u32::from(a) * u32::from(b)) >> BRIGHTNESS_BITS
}

/// Scales one channel by a fixed-point factor, saturating at 255.
#[inline]
pub fn scale_channel(channel: u8, factor: u32) -> u8 {
    ((u32::from(channel) * factor) >> BRIGHTNESS_BITS).min(0xff) as u8
}

/// Placeholder color for pen `index` before the driver sets it.
///
/// Cycles through the seven non-black corners of the RGB cube.
pub fn default_color(index: usize) -> Rgb {
    let bits = (index % 7) + 1;
    let channel = |bit: usize| if bits & bit != 0 { 0xff } else { 0x00 };
    Rgb::new(channel(1), channel(2), channel(4))
}
