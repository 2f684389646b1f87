//! The palette manager.
//!
//! [`Palette`] keeps three views of every pen in sync:
//!
//! - **raw**: the color the driver set
//! - **adjusted**: raw scaled by the pen's brightness (and, for shadow and
//!   highlight pens, the global shadow or highlight factor), then passed
//!   through the gamma/brightness [`Correction`]
//! - **pen value**: what the display consumes, per [`DisplayFormat`]
//!
//! Every adjusted color is a pure function of raw colors, per-pen brightness
//! and the global factors. Changes propagate only when an adjusted color
//! actually changes; in indexed formats that means calling the registered
//! change notifiers, most recently registered first.
//!
//! # Pen layout
//!
//! With `N` base colors in an indexed format, shadows add pens `N..2N` and
//! highlights add `2N..3N`. Setting a base pen also sets its shadow and
//! highlight partners. Two UI pens, black then white, follow the last
//! usable pen.
//!
//! # Example
//!
//! ```rust
//! use arcadia_palette::{DisplayFormat, Palette, PaletteLayout, Rgb};
//!
//! let layout = PaletteLayout::new(16, DisplayFormat::Indexed).with_shadows(true);
//! let mut palette = Palette::new(layout)?;
//! assert_eq!(palette.total_colors(), 32);
//!
//! palette.set_color(3, 200, 100, 0)?;
//! assert_eq!(palette.get_color(3), Rgb::new(200, 100, 0));
//! assert_eq!(palette.get_color(palette.white_pen()), Rgb::WHITE);
//! # Ok::<(), arcadia_palette::PaletteError>(())
//! ```

use crate::color::{
    BRIGHTNESS_UNITY, Rgb, brightness_from_f32, brightness_to_f32, combine_factors,
    default_color, scale_channel,
};
use crate::colortable::ColorTable;
use crate::correction::Correction;
use crate::error::{MAX_COLORS, PaletteError};
use crate::format::DisplayFormat;
use crate::shadow::{SHADOW_PRESETS, ShadowConfig, ShadowTable};

type Result<T> = core::result::Result<T, PaletteError>;

/// Callback told about every adjusted color change in indexed formats.
pub type ChangeNotifier = Box<dyn FnMut(usize, Rgb)>;

/// Default darkening applied to shadow pens.
pub const DEFAULT_SHADOW_FACTOR: f32 = 0.6;

/// Default lightening applied to highlight pens.
pub const DEFAULT_HIGHLIGHT_FACTOR: f32 = 1.0 / 0.6;

/// Shape of a palette, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteLayout {
    /// Base colors declared by the driver.
    pub colors: usize,
    /// Color table entries; zero means one entry per pen.
    pub color_table_length: usize,
    /// Display pixel format.
    pub format: DisplayFormat,
    /// Add a shadow pen per base pen (indexed formats).
    pub shadows: bool,
    /// Add a highlight pen per base pen (indexed formats).
    pub highlights: bool,
}

impl PaletteLayout {
    /// A layout with `colors` base colors and no derived pens.
    pub fn new(colors: usize, format: DisplayFormat) -> Self {
        Self {
            colors,
            color_table_length: 0,
            format,
            shadows: false,
            highlights: false,
        }
    }

    /// Enables or disables shadow pens.
    #[must_use]
    pub fn with_shadows(mut self, enabled: bool) -> Self {
        self.shadows = enabled;
        self
    }

    /// Enables or disables highlight pens.
    #[must_use]
    pub fn with_highlights(mut self, enabled: bool) -> Self {
        self.highlights = enabled;
        self
    }

    /// Sets the color table length.
    #[must_use]
    pub fn with_color_table(mut self, length: usize) -> Self {
        self.color_table_length = length;
        self
    }

    /// Copies of the base palette held: 3 with highlights, 2 with shadows
    /// only, 1 otherwise. Direct formats never replicate.
    pub fn multiplier(&self) -> usize {
        if !self.format.is_indexed() {
            1
        } else if self.highlights {
            3
        } else if self.shadows {
            2
        } else {
            1
        }
    }

    /// Usable pens, excluding the two UI pens.
    pub fn total_colors(&self) -> usize {
        self.colors.saturating_mul(self.multiplier())
    }
}

/// Canonical color state of one running machine.
pub struct Palette {
    format: DisplayFormat,
    base_colors: usize,
    multiplier: usize,
    total: usize,

    raw: Vec<Rgb>,
    adjusted: Vec<Rgb>,
    pen_values: Vec<u32>,
    brightness: Vec<u16>,

    shadow_factor: u16,
    highlight_factor: u16,
    correction: Correction,

    shadow_tables: [ShadowTable; SHADOW_PRESETS],
    active_shadow: usize,
    color_table: ColorTable,

    notifiers: Vec<ChangeNotifier>,
    initializing: bool,
}

impl core::fmt::Debug for Palette {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Palette")
            .field("format", &self.format)
            .field("base_colors", &self.base_colors)
            .field("total", &self.total)
            .field("shadow_factor", &self.shadow_factor)
            .field("highlight_factor", &self.highlight_factor)
            .field("active_shadow", &self.active_shadow)
            .field("notifiers", &self.notifiers.len())
            .finish_non_exhaustive()
    }
}

impl Palette {
    /// Allocates a palette for `layout`.
    ///
    /// Every pen starts at a placeholder color that is never black, with
    /// unity brightness. Fails if the expanded palette would not leave room
    /// for the two UI pens.
    pub fn new(layout: PaletteLayout) -> Result<Self> {
        let total = layout.total_colors();
        if total > MAX_COLORS {
            return Err(PaletteError::TooManyColors { requested: total });
        }

        let raw: Vec<Rgb> = (0..total)
            .map(default_color)
            .chain([Rgb::BLACK, Rgb::WHITE])
            .collect();
        let table_length = if layout.color_table_length == 0 {
            total
        } else {
            layout.color_table_length
        };

        let mut palette = Self {
            format: layout.format,
            base_colors: layout.colors,
            multiplier: layout.multiplier(),
            total,
            adjusted: raw.clone(),
            pen_values: vec![0; raw.len()],
            raw,
            brightness: vec![BRIGHTNESS_UNITY; total],
            shadow_factor: brightness_from_f32(DEFAULT_SHADOW_FACTOR),
            highlight_factor: brightness_from_f32(DEFAULT_HIGHLIGHT_FACTOR),
            correction: Correction::default(),
            shadow_tables: core::array::from_fn(|_| ShadowTable::new()),
            active_shadow: 0,
            color_table: ColorTable::new(table_length, total),
            notifiers: Vec::new(),
            initializing: true,
        };

        for pen in 0..palette.pen_values.len() {
            if pen < total {
                palette.adjusted[pen] = palette.compute_adjusted(pen);
            }
            palette.pen_values[pen] = palette.format.pen_value(pen, palette.adjusted[pen]);
        }
        palette.build_shadow_tables();

        tracing::debug!(
            "palette_init: {} base colors x{} = {total} pens, format {}",
            layout.colors,
            palette.multiplier,
            palette.format
        );
        Ok(palette)
    }

    // --- Initialization phase ---

    /// Registers a change notifier.
    ///
    /// Only allowed before [`finish_init()`](Self::finish_init). Notifiers
    /// run most recently registered first, after the new color is stored.
    pub fn add_change_notifier(&mut self, notifier: impl FnMut(usize, Rgb) + 'static) -> Result<()> {
        if !self.initializing {
            return Err(PaletteError::NotifierAfterInit);
        }
        self.notifiers.push(Box::new(notifier));
        Ok(())
    }

    /// Ends the initialization phase.
    pub fn finish_init(&mut self) {
        self.initializing = false;
    }

    /// Whether the palette is still in its initialization phase.
    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    // --- Shape ---

    /// Display pixel format.
    pub fn format(&self) -> DisplayFormat {
        self.format
    }

    /// Base colors declared by the driver.
    pub fn base_colors(&self) -> usize {
        self.base_colors
    }

    /// Usable pens, including shadow and highlight pens.
    pub fn total_colors(&self) -> usize {
        self.total
    }

    /// Usable pens plus the two UI pens.
    pub fn total_colors_with_ui(&self) -> usize {
        self.total + 2
    }

    /// Pen that is always black.
    pub fn black_pen(&self) -> usize {
        self.total
    }

    /// Pen that is always white.
    pub fn white_pen(&self) -> usize {
        self.total + 1
    }

    // --- Colors ---

    /// Sets a pen's raw color.
    ///
    /// Setting a base pen also sets its shadow and highlight partners.
    pub fn set_color(&mut self, pen: usize, r: u8, g: u8, b: u8) -> Result<()> {
        self.check_pen(pen)?;
        let color = Rgb::new(r, g, b);
        self.raw[pen] = color;
        self.modify_pen(pen);
        for partner in self.partners(pen).into_iter().flatten() {
            self.raw[partner] = color;
            self.modify_pen(partner);
        }
        Ok(())
    }

    /// Sets consecutive pens starting at `start`.
    pub fn set_colors(&mut self, start: usize, colors: &[Rgb]) -> Result<()> {
        if !colors.is_empty() {
            let last = start
                .checked_add(colors.len() - 1)
                .ok_or(PaletteError::PenOutOfRange {
                    pen: start,
                    total: self.total,
                })?;
            self.check_pen(last)?;
        }
        for (offset, color) in colors.iter().enumerate() {
            self.set_color(start + offset, color.r, color.g, color.b)?;
        }
        Ok(())
    }

    /// Raw color of a pen.
    ///
    /// The UI pens read as black and white. Any other out-of-range pen is
    /// logged and reads as black.
    pub fn get_color(&self, pen: usize) -> Rgb {
        match self.raw.get(pen) {
            Some(color) => *color,
            None => {
                tracing::warn!(
                    "palette_get_color: pen {pen} out of range ({} pens)",
                    self.raw.len()
                );
                Rgb::BLACK
            }
        }
    }

    /// Raw colors of every pen, UI pens last.
    pub fn raw_colors(&self) -> &[Rgb] {
        &self.raw
    }

    /// Adjusted colors of every pen, UI pens last.
    pub fn adjusted_colors(&self) -> &[Rgb] {
        &self.adjusted
    }

    /// Display values of every pen, UI pens last.
    pub fn pen_values(&self) -> &[u32] {
        &self.pen_values
    }

    // --- Brightness ---

    /// Sets a pen's brightness (0.0 to 4.0, saturating).
    ///
    /// Setting a base pen also sets its shadow and highlight partners.
    pub fn set_brightness(&mut self, pen: usize, factor: f32) -> Result<()> {
        self.check_pen(pen)?;
        let value = brightness_from_f32(factor);
        if self.brightness[pen] == value {
            return Ok(());
        }
        self.brightness[pen] = value;
        self.modify_pen(pen);
        for partner in self.partners(pen).into_iter().flatten() {
            self.brightness[partner] = value;
            self.modify_pen(partner);
        }
        Ok(())
    }

    /// Brightness of a pen, `None` outside the usable pens.
    pub fn brightness(&self, pen: usize) -> Option<f32> {
        self.brightness.get(pen).copied().map(brightness_to_f32)
    }

    /// Sets the global shadow factor (0.0 to 4.0, saturating).
    pub fn set_shadow_factor(&mut self, factor: f32) {
        let value = brightness_from_f32(factor);
        if value == self.shadow_factor {
            return;
        }
        tracing::debug!("palette_shadow_factor: {factor}");
        self.shadow_factor = value;
        self.rescale_direct_table(0, value);
        self.recompute_all();
    }

    /// Sets the global highlight factor (0.0 to 4.0, saturating).
    pub fn set_highlight_factor(&mut self, factor: f32) {
        let value = brightness_from_f32(factor);
        if value == self.highlight_factor {
            return;
        }
        tracing::debug!("palette_highlight_factor: {factor}");
        self.highlight_factor = value;
        self.rescale_direct_table(1, value);
        self.recompute_all();
    }

    /// Global shadow factor.
    pub fn shadow_factor(&self) -> f32 {
        brightness_to_f32(self.shadow_factor)
    }

    /// Global highlight factor.
    pub fn highlight_factor(&self) -> f32 {
        brightness_to_f32(self.highlight_factor)
    }

    /// Sets the global brightness multiplier of the correction curve.
    pub fn set_global_brightness(&mut self, brightness: f32) {
        self.correction = Correction::new(self.correction.gamma(), brightness);
        self.recompute_all();
    }

    /// Sets the gamma exponent of the correction curve.
    pub fn set_gamma(&mut self, gamma: f32) {
        self.correction = Correction::new(gamma, self.correction.brightness());
        self.recompute_all();
    }

    /// The active correction curve.
    pub fn correction(&self) -> &Correction {
        &self.correction
    }

    /// Rescales the luminance of pens `start..=end` to span
    /// `lum_min..=lum_max`, keeping each pen's chroma.
    ///
    /// A bound of `None` keeps the range's current minimum or maximum.
    pub fn normalize_range(
        &mut self,
        start: usize,
        end: usize,
        lum_min: Option<u8>,
        lum_max: Option<u8>,
    ) -> Result<()> {
        if start > end {
            return Ok(());
        }
        self.check_pen(end)?;

        let lumas: Vec<i64> = self.raw[start..=end].iter().map(|&c| luma(c)).collect();
        let ymin = lumas.iter().copied().min().unwrap_or(0);
        let ymax = lumas.iter().copied().max().unwrap_or(0);
        let tmin = lum_min.map_or((ymin + 500) / 1000, i64::from);
        let tmax = lum_max.map_or((ymax + 500) / 1000, i64::from);

        for (pen, y) in (start..=end).zip(lumas) {
            let color = self.raw[pen];
            let target = if ymax == ymin {
                tmin
            } else {
                tmin + (y - ymin) * (tmax - tmin) / (ymax - ymin)
            };
            let (r, g, b) = (i64::from(color.r), i64::from(color.g), i64::from(color.b));
            let u = -169 * r - 331 * g + 500 * b;
            let v = 500 * r - 419 * g - 81 * b;
            let channel = |value: i64| value.clamp(0, 255) as u8;
            self.set_color(
                pen,
                channel(target + 1402 * v / 1_000_000),
                channel(target - (344 * u + 714 * v) / 1_000_000),
                channel(target + 1772 * u / 1_000_000),
            )?;
        }
        Ok(())
    }

    // --- Shadow tables ---

    /// Selects the shadow table renderers use.
    pub fn set_shadow_mode(&mut self, preset: usize) -> Result<()> {
        check_preset(preset)?;
        self.active_shadow = preset;
        Ok(())
    }

    /// Index of the active shadow table.
    pub fn shadow_mode(&self) -> usize {
        self.active_shadow
    }

    /// The active shadow table.
    pub fn active_shadow_table(&self) -> &ShadowTable {
        &self.shadow_tables[self.active_shadow]
    }

    /// One preset shadow table.
    pub fn shadow_table(&self, preset: usize) -> Option<&ShadowTable> {
        self.shadow_tables.get(preset)
    }

    /// How many times a preset table has been generated.
    pub fn regeneration_count(&self, preset: usize) -> Option<u32> {
        self.shadow_table(preset).map(ShadowTable::regenerations)
    }

    /// Regenerates a direct-format shadow table from per-channel deltas.
    ///
    /// Deltas are clamped to `±255`. With `noclip` channels wrap at 0/255
    /// instead of saturating. Repeating the current configuration does
    /// nothing, and indexed formats ignore the call.
    pub fn set_shadow_drgb(
        &mut self,
        preset: usize,
        dr: i32,
        dg: i32,
        db: i32,
        noclip: bool,
    ) -> Result<()> {
        check_preset(preset)?;
        if self.format.is_indexed() {
            tracing::debug!("palette_shadow_drgb: ignored for indexed format");
            return Ok(());
        }
        let config = ShadowConfig::delta(dr, dg, db, noclip);
        if self.shadow_tables[preset].config() == config {
            return Ok(());
        }
        self.shadow_tables[preset].build_direct(config, self.format);
        tracing::debug!("palette_shadow_drgb: preset {preset} {config:?}");
        Ok(())
    }

    // --- Color table ---

    /// Lookup index to pen mapping.
    pub fn color_table(&self) -> &ColorTable {
        &self.color_table
    }

    /// Points color table entry `index` at `pen`.
    pub fn set_color_table_entry(&mut self, index: usize, pen: u32) -> Result<()> {
        self.color_table.set_entry(index, pen)
    }

    // --- Internals ---

    fn check_pen(&self, pen: usize) -> Result<()> {
        if pen < self.total {
            Ok(())
        } else {
            Err(PaletteError::PenOutOfRange {
                pen,
                total: self.total,
            })
        }
    }

    /// Shadow and highlight pens derived from a base pen.
    fn partners(&self, pen: usize) -> [Option<usize>; 2] {
        if pen >= self.base_colors {
            return [None, None];
        }
        let derived = |copy: usize| (copy < self.multiplier).then(|| pen + copy * self.base_colors);
        [derived(1), derived(2)]
    }

    /// Global factor for the pen's region: unity, shadow or highlight.
    fn region_factor(&self, pen: usize) -> u16 {
        if self.multiplier == 1 || pen < self.base_colors {
            BRIGHTNESS_UNITY
        } else if pen < 2 * self.base_colors {
            self.shadow_factor
        } else {
            self.highlight_factor
        }
    }

    fn compute_adjusted(&self, pen: usize) -> Rgb {
        let factor = combine_factors(self.brightness[pen], self.region_factor(pen));
        self.raw[pen].map(|c| self.correction.apply(scale_channel(c, factor)))
    }

    /// Recomputes one pen and propagates if its adjusted color changed.
    fn modify_pen(&mut self, pen: usize) {
        let color = self.compute_adjusted(pen);
        if self.adjusted[pen] == color {
            return;
        }
        self.adjusted[pen] = color;
        self.pen_values[pen] = self.format.pen_value(pen, color);
        if self.format.is_indexed() {
            for notify in self.notifiers.iter_mut().rev() {
                notify(pen, color);
            }
        }
        tracing::trace!("palette_modify: pen {pen} -> {color}");
    }

    fn recompute_all(&mut self) {
        for pen in 0..self.total {
            self.modify_pen(pen);
        }
    }

    fn build_shadow_tables(&mut self) {
        let pens = self.total_colors_with_ui();
        let base = self.base_colors;
        if self.format.is_indexed() {
            let offset = |copy: usize| {
                if copy < self.multiplier {
                    ShadowConfig::PenOffset(copy * base)
                } else {
                    ShadowConfig::Identity
                }
            };
            let configs = [offset(1), offset(2), ShadowConfig::Identity, ShadowConfig::Identity];
            for (table, config) in self.shadow_tables.iter_mut().zip(configs) {
                table.build_indexed(config, pens, base);
            }
        } else {
            let configs = [
                ShadowConfig::Scale(self.shadow_factor),
                ShadowConfig::Scale(self.highlight_factor),
                ShadowConfig::Identity,
                ShadowConfig::Identity,
            ];
            for (table, config) in self.shadow_tables.iter_mut().zip(configs) {
                table.build_direct(config, self.format);
            }
        }
    }

    /// Regenerates a factor-driven direct table unless it was reconfigured
    /// with explicit deltas.
    fn rescale_direct_table(&mut self, preset: usize, factor: u16) {
        let table = &mut self.shadow_tables[preset];
        if !self.format.is_indexed() && matches!(table.config(), ShadowConfig::Scale(_)) {
            table.build_direct(ShadowConfig::Scale(factor), self.format);
        }
    }
}

/// Luma in thousandths (BT.601 weights).
fn luma(color: Rgb) -> i64 {
    299 * i64::from(color.r) + 587 * i64::from(color.g) + 114 * i64::from(color.b)
}

fn check_preset(preset: usize) -> Result<()> {
    if preset < SHADOW_PRESETS {
        Ok(())
    } else {
        Err(PaletteError::InvalidPreset(preset))
    }
}
