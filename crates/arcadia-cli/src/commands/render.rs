//! Render a machine's audio output to a WAV file.

use anyhow::Context;
use arcadia_io::{WavSpec, render, render_stereo, write_wav, write_wav_stereo};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Machine file, user machine name or factory machine name
    #[arg(value_name = "MACHINE")]
    machine: String,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(short, long, default_value = "5.0")]
    seconds: f64,

    /// Stream to render instead of the machine's output
    #[arg(long, value_name = "TAG")]
    stream: Option<String>,

    /// Stream to render as the right channel (writes a stereo file)
    #[arg(long, value_name = "TAG")]
    right: Option<String>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "16")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !(args.seconds.is_finite() && args.seconds > 0.0) {
        anyhow::bail!("duration must be positive, got {}", args.seconds);
    }

    let (config, mut machine) = super::load_machine(&args.machine)?;
    let left = match &args.stream {
        Some(tag) => machine
            .graph()
            .find(tag, 0)
            .with_context(|| format!("machine '{}' has no stream '{tag}'", config.name))?,
        None => machine.output(),
    };
    let right = args
        .right
        .as_deref()
        .map(|tag| {
            machine
                .graph()
                .find(tag, 0)
                .with_context(|| format!("machine '{}' has no stream '{tag}'", config.name))
        })
        .transpose()?;

    let sample_rate = machine.graph().sample_rate(left)?;
    let frames = (args.seconds * config.refresh_rate).round().max(1.0) as usize;
    let spec = WavSpec::new(sample_rate).with_bits(args.bit_depth);

    println!("Rendering {} ({frames} frames at {} Hz)...", config.name, config.refresh_rate);

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")?
            .progress_chars("##-"),
    );
    let on_frame = |n: usize| pb.set_position(n as u64);

    let graph = machine.graph_mut();
    let (samples, peak) = if let Some(right) = right {
        let stereo = render_stereo(graph, left, right, frames, on_frame)?;
        pb.finish_with_message("done");
        write_wav_stereo(&args.output, &stereo, spec)?;
        let peak = peak(&stereo.left).max(peak(&stereo.right));
        (stereo.len(), peak)
    } else {
        let mono = render(graph, left, frames, on_frame)?;
        pb.finish_with_message("done");
        write_wav(&args.output, &mono, spec)?;
        (mono.len(), peak(&mono))
    };

    println!(
        "Wrote {} ({samples} samples at {sample_rate} Hz, {:.2}s, peak {peak})",
        args.output.display(),
        samples as f64 / f64::from(sample_rate)
    );
    if peak > i32::from(i16::MAX) {
        println!("  warning: output exceeds 16 bits and was clipped");
    }
    Ok(())
}

fn peak(samples: &[i32]) -> i32 {
    samples.iter().map(|s| s.saturating_abs()).max().unwrap_or(0)
}
