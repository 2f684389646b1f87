//! Palette configuration.

use serde::{Deserialize, Serialize};

use arcadia_palette::{DisplayFormat, PaletteLayout, Rgb};

/// Serialized display format name.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormatName {
    /// Pen indices with change notification.
    #[default]
    Indexed,
    /// 5-5-5 RGB.
    Rgb15,
    /// `0xRRGGBB`.
    Rgb32,
}

impl From<FormatName> for DisplayFormat {
    fn from(name: FormatName) -> Self {
        match name {
            FormatName::Indexed => DisplayFormat::Indexed,
            FormatName::Rgb15 => DisplayFormat::Direct15,
            FormatName::Rgb32 => DisplayFormat::Direct32,
        }
    }
}

/// The `[palette]` table of a machine file.
///
/// ```toml
/// [palette]
/// colors = 16
/// format = "indexed"
/// shadows = true
/// pens = ["#000000", "#ff0000"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaletteConfig {
    /// Base colors.
    pub colors: usize,

    /// Display format.
    #[serde(default)]
    pub format: FormatName,

    /// Allocate shadow pens.
    #[serde(default)]
    pub shadows: bool,

    /// Allocate highlight pens.
    #[serde(default)]
    pub highlights: bool,

    /// Color table length; zero means one entry per pen.
    #[serde(default)]
    pub color_table: usize,

    /// Shadow factor override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_factor: Option<f32>,

    /// Highlight factor override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_factor: Option<f32>,

    /// Gamma override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f32>,

    /// Global brightness override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,

    /// Initial colors as `#rrggbb`, applied from pen 0.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pens: Vec<String>,
}

impl PaletteConfig {
    /// A palette of `colors` base colors with defaults for everything else.
    pub fn new(colors: usize) -> Self {
        Self {
            colors,
            format: FormatName::Indexed,
            shadows: false,
            highlights: false,
            color_table: 0,
            shadow_factor: None,
            highlight_factor: None,
            gamma: None,
            brightness: None,
            pens: Vec::new(),
        }
    }

    /// Set the display format.
    pub fn with_format(mut self, format: FormatName) -> Self {
        self.format = format;
        self
    }

    /// Enable shadow pens.
    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.shadows = enabled;
        self
    }

    /// Enable highlight pens.
    pub fn with_highlights(mut self, enabled: bool) -> Self {
        self.highlights = enabled;
        self
    }

    /// Add an initial pen color.
    pub fn with_pen(mut self, color: Rgb) -> Self {
        self.pens.push(format!("#{:06x}", color.to_u32()));
        self
    }

    /// The engine layout this configuration describes.
    pub fn layout(&self) -> PaletteLayout {
        PaletteLayout::new(self.colors, self.format.into())
            .with_shadows(self.shadows)
            .with_highlights(self.highlights)
            .with_color_table(self.color_table)
    }
}

/// Parses `#rrggbb` (the `#` is optional).
pub fn parse_color(value: &str) -> Option<Rgb> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(Rgb::from)
}
