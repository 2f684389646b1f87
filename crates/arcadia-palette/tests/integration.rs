//! Integration tests for arcadia-palette.
//!
//! Exercises the public palette surface the way a video driver would: layout
//! sizing, color and brightness updates with notifier propagation, shadow
//! and highlight pens, and translucency table maintenance.

use std::cell::RefCell;
use std::rc::Rc;

use arcadia_palette::{DisplayFormat, Palette, PaletteError, PaletteLayout, Rgb};

type Log = Rc<RefCell<Vec<(usize, u32)>>>;

fn with_log(palette: &mut Palette) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    palette
        .add_change_notifier(move |pen, color| sink.borrow_mut().push((pen, color.to_u32())))
        .unwrap();
    log
}

// ============================================================================
// 1. Layout
// ============================================================================

#[test]
fn shadow_palette_doubles_pens() {
    for n in [1, 16, 256, 32767] {
        let layout = PaletteLayout::new(n, DisplayFormat::Indexed).with_shadows(true);
        let palette = Palette::new(layout).unwrap();
        assert_eq!(palette.total_colors(), 2 * n);
        assert_eq!(palette.total_colors_with_ui(), 2 * n + 2);
        assert_eq!(palette.raw_colors().len(), 2 * n + 2);
    }
}

#[test]
fn direct_formats_do_not_replicate() {
    for format in [DisplayFormat::Direct15, DisplayFormat::Direct32] {
        let layout = PaletteLayout::new(64, format)
            .with_shadows(true)
            .with_highlights(true);
        assert_eq!(Palette::new(layout).unwrap().total_colors(), 64);
    }
}

#[test]
fn highlight_palette_triples_pens() {
    let layout = PaletteLayout::new(1000, DisplayFormat::Indexed)
        .with_shadows(true)
        .with_highlights(true);
    assert_eq!(Palette::new(layout).unwrap().total_colors(), 3000);

    let too_big = PaletteLayout::new(30000, DisplayFormat::Indexed).with_highlights(true);
    assert!(matches!(
        Palette::new(too_big),
        Err(PaletteError::TooManyColors { requested: 90000 })
    ));
}

// ============================================================================
// 2. Colors and notification
// ============================================================================

#[test]
fn set_color_notifies_once() {
    let mut palette = Palette::new(PaletteLayout::new(16, DisplayFormat::Indexed)).unwrap();
    let log = with_log(&mut palette);
    palette.finish_init();

    palette.set_color(5, 0xff, 0x00, 0x00).unwrap();

    assert_eq!(palette.get_color(5), Rgb::new(255, 0, 0));
    assert_eq!(*log.borrow(), vec![(5, 0xff0000)]);
}

#[test]
fn shadow_partner_is_notified_after_base() {
    let layout = PaletteLayout::new(4, DisplayFormat::Indexed).with_shadows(true);
    let mut palette = Palette::new(layout).unwrap();
    let log = with_log(&mut palette);

    palette.set_color(2, 0, 0, 200).unwrap();
    let calls = log.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], (2, 0x0000c8));
    // 200 * 153 / 256
    assert_eq!(calls[1], (6, 0x000077));
}

#[test]
fn direct_formats_never_notify() {
    let mut palette = Palette::new(PaletteLayout::new(4, DisplayFormat::Direct32)).unwrap();
    let log = with_log(&mut palette);
    palette.set_color(0, 1, 2, 3).unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(palette.pen_values()[0], 0x010203);
}

#[test]
fn bulk_set_matches_individual_sets() {
    let colors = [Rgb::new(1, 2, 3), Rgb::new(4, 5, 6), Rgb::new(7, 8, 9)];
    let mut bulk = Palette::new(PaletteLayout::new(8, DisplayFormat::Indexed)).unwrap();
    bulk.set_colors(2, &colors).unwrap();

    let mut single = Palette::new(PaletteLayout::new(8, DisplayFormat::Indexed)).unwrap();
    for (i, c) in colors.iter().enumerate() {
        single.set_color(2 + i, c.r, c.g, c.b).unwrap();
    }
    assert_eq!(bulk.raw_colors(), single.raw_colors());
    assert_eq!(bulk.adjusted_colors(), single.adjusted_colors());
}

// ============================================================================
// 3. Brightness and shadow linearity
// ============================================================================

#[test]
fn brightness_scales_adjusted_not_raw() {
    let layout = PaletteLayout::new(8, DisplayFormat::Indexed).with_shadows(true);
    let mut palette = Palette::new(layout).unwrap();
    palette.set_color(3, 200, 100, 40).unwrap();
    palette.set_brightness(3, 0.5).unwrap();

    assert_eq!(palette.get_color(3), Rgb::new(200, 100, 40));
    assert_eq!(palette.adjusted_colors()[3], Rgb::new(100, 50, 20));
    assert_eq!(palette.brightness(3), Some(0.5));

    // Shadow pen: raw * (0x80 * 153 >> 8 = 76) >> 8.
    assert_eq!(palette.adjusted_colors()[11], Rgb::new(59, 29, 11));
}

#[test]
fn brightness_saturates_channels() {
    let mut palette = Palette::new(PaletteLayout::new(2, DisplayFormat::Indexed)).unwrap();
    palette.set_color(0, 100, 200, 0).unwrap();
    palette.set_brightness(0, 10.0).unwrap();
    assert_eq!(palette.brightness(0), Some(4.0));
    assert_eq!(palette.adjusted_colors()[0], Rgb::new(255, 255, 0));
}

#[test]
fn shadow_factor_change_renotifies_every_shadow_pen() {
    let layout = PaletteLayout::new(3, DisplayFormat::Indexed).with_shadows(true);
    let mut palette = Palette::new(layout).unwrap();
    let log = with_log(&mut palette);

    palette.set_shadow_factor(0.25);
    let pens: Vec<usize> = log.borrow().iter().map(|&(pen, _)| pen).collect();
    assert_eq!(pens, vec![3, 4, 5]);

    log.borrow_mut().clear();
    palette.set_shadow_factor(0.25);
    assert!(log.borrow().is_empty());
}

// ============================================================================
// 4. Shadow tables
// ============================================================================

#[test]
fn repeated_drgb_does_not_regenerate() {
    let mut palette = Palette::new(PaletteLayout::new(16, DisplayFormat::Direct15)).unwrap();
    let start = palette.regeneration_count(2).unwrap();

    palette.set_shadow_drgb(2, -40, -40, -40, false).unwrap();
    assert_eq!(palette.regeneration_count(2), Some(start + 1));

    palette.set_shadow_drgb(2, -40, -40, -40, false).unwrap();
    assert_eq!(palette.regeneration_count(2), Some(start + 1));

    // Clamped deltas compare equal to their clamped form.
    palette.set_shadow_drgb(3, 500, 0, 0, true).unwrap();
    palette.set_shadow_drgb(3, 255, 0, 0, true).unwrap();
    assert_eq!(palette.regeneration_count(3), Some(start + 1));
}

#[test]
fn active_table_follows_shadow_mode() {
    let mut palette = Palette::new(PaletteLayout::new(16, DisplayFormat::Direct32)).unwrap();
    palette.set_shadow_drgb(3, 16, 0, 0, false).unwrap();
    palette.set_shadow_mode(3).unwrap();

    let table = palette.active_shadow_table();
    assert_eq!(table.entries().len(), arcadia_palette::DIRECT_TABLE_SIZE);
    assert_eq!(table.map(0), 0x100000);
    assert!(matches!(
        palette.set_shadow_drgb(7, 0, 0, 0, false),
        Err(PaletteError::InvalidPreset(7))
    ));
}
