//! Frame-by-frame rendering of stream outputs.

use arcadia_sound::fixed::apply_gain;
use arcadia_sound::{StreamGraph, StreamId};

use crate::wav::StereoSamples;
use crate::{Error, Result};

/// Runs `frames` emulated frames and collects output 0 of `stream`.
///
/// Each frame calls `frame_update` and then drains everything the stream
/// generated, with the output's gain applied. `progress` is called with the
/// number of frames completed so far.
pub fn render(
    graph: &mut StreamGraph,
    stream: StreamId,
    frames: usize,
    mut progress: impl FnMut(usize),
) -> Result<Vec<i32>> {
    let rate = graph.sample_rate(stream)?;
    let per_frame = (f64::from(rate) / graph.refresh_rate()).ceil() as usize;
    let mut samples = Vec::with_capacity(per_frame * frames);

    for frame in 0..frames {
        graph.frame_update();
        drain(graph, stream, &mut samples)?;
        progress(frame + 1);
    }

    tracing::debug!(
        "render: {stream} {frames} frames, {} samples at {rate} Hz",
        samples.len()
    );
    Ok(samples)
}

/// Like [`render`], for a left and a right stream running at the same rate.
pub fn render_stereo(
    graph: &mut StreamGraph,
    left: StreamId,
    right: StreamId,
    frames: usize,
    mut progress: impl FnMut(usize),
) -> Result<StereoSamples> {
    let left_rate = graph.sample_rate(left)?;
    let right_rate = graph.sample_rate(right)?;
    if left_rate != right_rate {
        return Err(Error::RateMismatch {
            left_stream: left,
            left: left_rate,
            right_stream: right,
            right: right_rate,
        });
    }

    let mut left_samples = Vec::new();
    let mut right_samples = Vec::new();
    for frame in 0..frames {
        graph.frame_update();
        drain(graph, left, &mut left_samples)?;
        drain(graph, right, &mut right_samples)?;
        progress(frame + 1);
    }

    Ok(StereoSamples::new(left_samples, right_samples))
}

fn drain(graph: &mut StreamGraph, stream: StreamId, into: &mut Vec<i32>) -> Result<()> {
    let state = graph.output_state(stream, 0)?;
    let chunk = graph.consume_output(stream, 0, state.available())?;
    into.extend(chunk.iter().map(|&s| apply_gain(s, state.gain)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_sound::{Mixer, Tone};

    #[test]
    fn renders_whole_frames() {
        let mut graph = StreamGraph::new(50.0).unwrap();
        let tone = graph.create(0, 1, 1000, Tone::new(0.0, 300, 1000));

        let mut seen = Vec::new();
        let samples = render(&mut graph, tone, 5, |n| seen.push(n)).unwrap();
        assert_eq!(samples.len(), 100);
        assert!(samples.iter().all(|&s| s == 300));
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn output_gain_is_applied() {
        let mut graph = StreamGraph::new(50.0).unwrap();
        let tone = graph.create(0, 1, 1000, Tone::new(0.0, 300, 1000));
        graph.set_output_gain(tone, 0, 2.0).unwrap();

        let samples = render(&mut graph, tone, 1, |_| {}).unwrap();
        assert!(samples.iter().all(|&s| s == 600));
    }

    #[test]
    fn stereo_needs_matching_rates() {
        let mut graph = StreamGraph::new(50.0).unwrap();
        let a = graph.create(0, 1, 1000, Tone::new(0.0, 1, 1000));
        let b = graph.create(0, 1, 2000, Tone::new(0.0, 1, 2000));
        assert!(matches!(
            render_stereo(&mut graph, a, b, 1, |_| {}),
            Err(Error::RateMismatch {
                left: 1000,
                right: 2000,
                ..
            })
        ));
    }

    #[test]
    fn stereo_pairs_channels() {
        let mut graph = StreamGraph::new(50.0).unwrap();
        let src = graph.create(0, 1, 2000, Tone::new(0.0, 100, 2000));
        let left = graph.create(1, 1, 1000, Mixer);
        let right = graph.create(1, 1, 1000, Mixer);
        graph.set_input(left, 0, Some(src), 0, 1.0).unwrap();
        graph.set_input(right, 0, Some(src), 0, 0.5).unwrap();

        let stereo = render_stereo(&mut graph, left, right, 3, |_| {}).unwrap();
        assert_eq!(stereo.len(), 60);
        assert!(stereo.left.iter().all(|&s| s == 100));
        assert!(stereo.right.iter().all(|&s| s == 50));
    }
}
