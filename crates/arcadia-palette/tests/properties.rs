//! Property-based tests for palette brightness arithmetic.

use arcadia_palette::color::{BRIGHTNESS_BITS, brightness_from_f32};
use arcadia_palette::{DisplayFormat, Palette, PaletteLayout, Rgb};
use proptest::prelude::*;

fn expected(channel: u8, factor: u32) -> u8 {
    ((u32::from(channel) * factor) >> BRIGHTNESS_BITS).min(255) as u8
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Adjusted base and shadow pens equal the raw color times the pen
    /// brightness, and times brightness * shadow factor, per channel.
    #[test]
    fn brightness_and_shadow_are_linear(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        brightness in 0.0f32..4.0,
        shadow in 0.0f32..4.0,
        pen in 0usize..32,
    ) {
        let layout = PaletteLayout::new(32, DisplayFormat::Indexed).with_shadows(true);
        let mut palette = Palette::new(layout).unwrap();
        palette.set_shadow_factor(shadow);
        palette.set_color(pen, r, g, b).unwrap();
        palette.set_brightness(pen, brightness).unwrap();

        let bright = u32::from(brightness_from_f32(brightness));
        let shade = (bright * u32::from(brightness_from_f32(shadow))) >> BRIGHTNESS_BITS;

        prop_assert_eq!(
            palette.adjusted_colors()[pen],
            Rgb::new(expected(r, bright), expected(g, bright), expected(b, bright))
        );
        prop_assert_eq!(
            palette.adjusted_colors()[pen + 32],
            Rgb::new(expected(r, shade), expected(g, shade), expected(b, shade))
        );
        prop_assert_eq!(palette.get_color(pen + 32), Rgb::new(r, g, b));
    }

    /// The hardware pen table always matches the adjusted colors.
    #[test]
    fn pen_values_track_adjusted(
        colors in prop::collection::vec(any::<(u8, u8, u8)>(), 1..64),
        direct15 in any::<bool>(),
    ) {
        let format = if direct15 { DisplayFormat::Direct15 } else { DisplayFormat::Direct32 };
        let mut palette = Palette::new(PaletteLayout::new(64, format)).unwrap();
        let rgb: Vec<Rgb> = colors.into_iter().map(Rgb::from).collect();
        palette.set_colors(0, &rgb).unwrap();

        for (pen, color) in palette.adjusted_colors().iter().enumerate() {
            prop_assert_eq!(palette.pen_values()[pen], format.pen_value(pen, *color));
        }
    }
}
