//! Show a machine's palette.

use arcadia_palette::{Palette, ShadowConfig};
use clap::Args;
use serde::Serialize;

#[derive(Args)]
pub struct PaletteArgs {
    /// Machine file, user machine name or factory machine name
    #[arg(value_name = "MACHINE")]
    machine: String,

    /// Number of pens to list (0 lists every pen)
    #[arg(short, long, default_value = "16")]
    pens: usize,

    /// Shadow preset to activate before listing (0-3)
    #[arg(long)]
    shadow_mode: Option<usize>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PaletteReport {
    machine: String,
    format: String,
    base_colors: usize,
    total_colors: usize,
    total_colors_with_ui: usize,
    shadow_factor: f32,
    highlight_factor: f32,
    gamma: f32,
    brightness: f32,
    color_table_length: usize,
    shadow_mode: usize,
    shadow_config: String,
    pens: Vec<PenReport>,
}

#[derive(Serialize)]
struct PenReport {
    pen: usize,
    raw: String,
    adjusted: String,
    value: u32,
}

pub fn run(args: PaletteArgs) -> anyhow::Result<()> {
    let (config, mut machine) = super::load_machine(&args.machine)?;
    let Some(palette) = machine.palette_mut() else {
        anyhow::bail!("machine '{}' has no palette", config.name);
    };
    palette.finish_init();
    if let Some(preset) = args.shadow_mode {
        palette.set_shadow_mode(preset)?;
    }

    let report = report(&config.name, palette, args.pens);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Machine:      {}", report.machine);
    println!("Format:       {}", report.format);
    println!(
        "Pens:         {} base, {} total, {} with UI",
        report.base_colors, report.total_colors, report.total_colors_with_ui
    );
    println!(
        "Factors:      shadow {:.3}, highlight {:.3}",
        report.shadow_factor, report.highlight_factor
    );
    println!(
        "Correction:   gamma {:.2}, brightness {:.2}",
        report.gamma, report.brightness
    );
    println!("Color table:  {} entries", report.color_table_length);
    println!(
        "Shadow mode:  {} ({})",
        report.shadow_mode, report.shadow_config
    );
    println!();
    println!("  {:>5}  {:8}  {:8}  {:>10}", "pen", "raw", "adjusted", "value");
    for pen in &report.pens {
        println!(
            "  {:>5}  {:8}  {:8}  {:#010x}",
            pen.pen, pen.raw, pen.adjusted, pen.value
        );
    }
    Ok(())
}

fn report(machine: &str, palette: &Palette, pens: usize) -> PaletteReport {
    let listed = if pens == 0 {
        palette.total_colors()
    } else {
        pens.min(palette.total_colors())
    };

    PaletteReport {
        machine: machine.to_string(),
        format: palette.format().to_string(),
        base_colors: palette.base_colors(),
        total_colors: palette.total_colors(),
        total_colors_with_ui: palette.total_colors_with_ui(),
        shadow_factor: palette.shadow_factor(),
        highlight_factor: palette.highlight_factor(),
        gamma: palette.correction().gamma(),
        brightness: palette.correction().brightness(),
        color_table_length: palette.color_table().len(),
        shadow_mode: palette.shadow_mode(),
        shadow_config: describe_shadow(palette.active_shadow_table().config()),
        pens: (0..listed)
            .map(|pen| PenReport {
                pen,
                raw: palette.raw_colors()[pen].to_string(),
                adjusted: palette.adjusted_colors()[pen].to_string(),
                value: palette.pen_values()[pen],
            })
            .collect(),
    }
}

fn describe_shadow(config: ShadowConfig) -> String {
    match config {
        ShadowConfig::Identity => "identity".to_string(),
        ShadowConfig::PenOffset(offset) => format!("pen offset +{offset}"),
        ShadowConfig::Scale(factor) => format!("scale {:.3}", f32::from(factor) / 256.0),
        ShadowConfig::Delta { dr, dg, db, noclip } => {
            format!("delta ({dr:+}, {dg:+}, {db:+}){}", if noclip { " noclip" } else { "" })
        }
    }
}
