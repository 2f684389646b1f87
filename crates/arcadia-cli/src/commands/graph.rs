//! Show a machine's stream graph.

use arcadia_sound::fixed::{FRAC_ONE, gain_to_f32};
use arcadia_sound::{Regime, StreamGraph, StreamId};
use clap::Args;
use serde::Serialize;

#[derive(Args)]
pub struct GraphArgs {
    /// Machine file, user machine name or factory machine name
    #[arg(value_name = "MACHINE")]
    machine: String,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct GraphReport {
    machine: String,
    refresh_rate: f64,
    output: String,
    streams: Vec<StreamReport>,
}

#[derive(Serialize)]
struct StreamReport {
    id: u32,
    tag: String,
    index: u32,
    kind: String,
    sample_rate: u32,
    output_gain: f32,
    dependents: usize,
    inputs: Vec<InputReport>,
}

#[derive(Serialize)]
struct InputReport {
    source: Option<String>,
    step: f64,
    regime: Option<&'static str>,
    gain: f32,
}

pub fn run(args: GraphArgs) -> anyhow::Result<()> {
    let (config, machine) = super::load_machine(&args.machine)?;
    let graph = machine.graph();

    let mut streams = Vec::with_capacity(graph.stream_count());
    for (id, stream) in graph.ids().zip(&config.streams) {
        streams.push(stream_report(graph, id, stream.kind.name())?);
    }

    let report = GraphReport {
        machine: config.name.clone(),
        refresh_rate: graph.refresh_rate(),
        output: describe(graph, machine.output())?,
        streams,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Machine: {} ({} Hz refresh)", report.machine, report.refresh_rate);
    println!("Output:  {}", report.output);
    println!();
    for stream in &report.streams {
        println!(
            "  #{:<3} {:12} {:8} {:>7} Hz  gain {:.2}  readers {}",
            stream.id,
            format!("{}:{}", stream.tag, stream.index),
            stream.kind,
            stream.sample_rate,
            stream.output_gain,
            stream.dependents
        );
        for (i, input) in stream.inputs.iter().enumerate() {
            match (&input.source, input.regime) {
                (Some(source), Some(regime)) => println!(
                    "        in{i} <- {source:12} step {:.4} ({regime})  gain {:.2}",
                    input.step, input.gain
                ),
                _ => println!("        in{i} <- (silence)"),
            }
        }
    }
    Ok(())
}

fn stream_report(graph: &StreamGraph, id: StreamId, kind: &str) -> anyhow::Result<StreamReport> {
    let (tag, index) = graph.tag(id)?;
    let output = graph.output_state(id, 0)?;

    let mut inputs = Vec::new();
    for input in 0..graph.input_count(id)? {
        let state = graph.input_state(id, input)?;
        let source = state
            .source
            .map(|src| describe(graph, src.stream))
            .transpose()?;
        let regime = state.source.map(|_| match Regime::for_step(state.step) {
            Regime::Unity => "unity",
            Regime::Upsample => "upsample",
            Regime::Downsample => "downsample",
        });
        inputs.push(InputReport {
            source,
            step: f64::from(state.step) / f64::from(FRAC_ONE),
            regime,
            gain: gain_to_f32(state.gain),
        });
    }

    Ok(StreamReport {
        id: id.index(),
        tag: tag.to_string(),
        index,
        kind: kind.to_string(),
        sample_rate: graph.sample_rate(id)?,
        output_gain: gain_to_f32(output.gain),
        dependents: output.dependents,
        inputs,
    })
}

fn describe(graph: &StreamGraph, id: StreamId) -> anyhow::Result<String> {
    let (tag, index) = graph.tag(id)?;
    Ok(format!("{tag}:{index}"))
}
