//! Integration tests for arcadia-io rendering and WAV output.

use arcadia_io::{WavSpec, read_wav, read_wav_info, read_wav_stereo, render, render_stereo, write_wav, write_wav_stereo};
use arcadia_sound::{Mixer, Noise, StreamGraph, Tone};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Graph to file
// ---------------------------------------------------------------------------

#[test]
fn one_second_of_resampled_tone() {
    let mut graph = StreamGraph::new(60.0).unwrap();
    let psg = graph.create(0, 1, 44100, Tone::new(441.0, 8000, 44100));
    let speaker = graph.create(1, 1, 48000, Mixer);
    graph.set_input(speaker, 0, Some(psg), 0, 1.0).unwrap();

    let samples = render(&mut graph, speaker, 60, |_| {}).unwrap();
    assert_eq!(samples.len(), 48000);
    assert!(samples.iter().all(|&s| (-8000..=8000).contains(&s)));
    assert!(samples.iter().any(|&s| s > 0) && samples.iter().any(|&s| s < 0));

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, WavSpec::new(48000)).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.num_frames, 48000);
    assert!((info.duration_secs - 1.0).abs() < 1e-9);

    let (loaded, spec) = read_wav(file.path()).unwrap();
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(loaded, samples);
}

#[test]
fn stereo_render_to_file() {
    let mut graph = StreamGraph::new(50.0).unwrap();
    let tone = graph.create(0, 1, 8000, Tone::new(100.0, 4000, 8000));
    let noise = graph.create(0, 1, 8000, Noise::new(2000.0, 2000, 8000));

    let stereo = render_stereo(&mut graph, tone, noise, 10, |_| {}).unwrap();
    assert_eq!(stereo.len(), 1600);

    let file = NamedTempFile::new().unwrap();
    write_wav_stereo(file.path(), &stereo, WavSpec::new(8000).with_bits(32)).unwrap();
    let (loaded, spec) = read_wav_stereo(file.path()).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(loaded, stereo);
}

#[test]
fn consecutive_renders_continue_the_stream() {
    let mut graph = StreamGraph::new(50.0).unwrap();
    let mut next = 0;
    let counter = graph.create(0, 1, 1000, move |_: &[&[i32]], out: &mut [&mut [i32]], n: usize| {
        for slot in out[0][..n].iter_mut() {
            *slot = next;
            next += 1;
        }
    });

    let first = render(&mut graph, counter, 3, |_| {}).unwrap();
    let second = render(&mut graph, counter, 3, |_| {}).unwrap();
    assert_eq!(first, (0..60).collect::<Vec<_>>());
    assert_eq!(second, (60..120).collect::<Vec<_>>());
}
