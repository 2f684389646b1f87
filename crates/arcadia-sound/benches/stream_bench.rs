//! Criterion benchmarks for the stream graph and resampler.
//!
//! Two axes:
//!
//! - **Resample** - raw conversion throughput per regime
//! - **Frame** - a full `frame_update()` over typical machine topologies
//!
//! Run with: `cargo bench -p arcadia-sound`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use arcadia_sound::fixed::{FRAC_ONE, GAIN_UNITY, step_rate};
use arcadia_sound::{Mixer, Noise, StreamGraph, Tone, required_source_end, resample};

const OUTPUT_RATE: u32 = 48000;
const BLOCK: usize = 800;

// ---------------------------------------------------------------------------
// Graph constructors
// ---------------------------------------------------------------------------

/// `n` tone chips at assorted rates mixed into one speaker stream.
fn make_arcade(n: usize) -> StreamGraph {
    let rates = [44100, 55930, 31250, 18432, 96000];
    let mut graph = StreamGraph::new(60.0).unwrap();
    graph.set_tag("speaker");
    let speaker = graph.create(n, 1, OUTPUT_RATE, Mixer);
    for i in 0..n {
        let rate = rates[i % rates.len()];
        graph.set_tag(format!("chip{i}"));
        let chip = if i % 2 == 0 {
            graph.create(0, 1, rate, Tone::new(220.0 * (i + 1) as f64, 2000, rate))
        } else {
            graph.create(0, 1, rate, Noise::new(1000.0, 2000, rate))
        };
        graph.set_input(speaker, i, Some(chip), 0, 0.5).unwrap();
    }
    graph
}

// ---------------------------------------------------------------------------
// Resample benchmarks
// ---------------------------------------------------------------------------

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    let cases = [
        ("unity", FRAC_ONE),
        ("upsample", step_rate(22050, OUTPUT_RATE)),
        ("downsample", step_rate(96000, OUTPUT_RATE)),
        ("downsample_8x", step_rate(384000, OUTPUT_RATE)),
    ];

    for (name, step) in cases {
        let len = required_source_end(0, step, BLOCK);
        let source: Vec<i32> = (0..len as i32).map(|i| (i * 37) % 4096 - 2048).collect();
        let mut dest = vec![0; BLOCK];
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut position = 0;
                resample(
                    black_box(&source),
                    &mut position,
                    step,
                    GAIN_UNITY,
                    &mut dest,
                );
                black_box(&dest);
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Frame benchmarks
// ---------------------------------------------------------------------------

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for n in [1, 4, 16] {
        group.bench_with_input(BenchmarkId::new("arcade", n), &n, |b, &n| {
            let mut graph = make_arcade(n);
            let speaker = graph.find("speaker", 0).unwrap();
            b.iter(|| {
                graph.frame_update();
                let available = graph.output_state(speaker, 0).unwrap().available();
                black_box(graph.consume_output(speaker, 0, available).unwrap());
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_resample, bench_frame);
criterion_main!(benches);
