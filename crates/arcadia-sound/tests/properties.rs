//! Property-based tests for the fixed-point resampler and the stream graph.
//!
//! Covers position bookkeeping across all three conversion regimes, exact
//! unity copies, gain linearity, and bounded output of the averaging filters.

use arcadia_sound::fixed::{FRAC_BITS, FRAC_MASK, FRAC_ONE, GAIN_UNITY};
use arcadia_sound::{Mixer, StreamGraph, required_source_end, resample};
use proptest::prelude::*;

/// Builds a source long enough for `count` samples from `position`.
fn source_for(position: u64, step: u32, count: usize, seed: &[i32]) -> Vec<i32> {
    let len = required_source_end(position, step, count).max(1);
    (0..len).map(|i| seed[i % seed.len()]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any step and start position, converting `count` samples advances
    /// the position by exactly `count * step`.
    #[test]
    fn position_advances_by_count_times_step(
        step in 1u32..(4 * FRAC_ONE),
        start_frac in 0u32..FRAC_ONE,
        start_whole in 0u64..64,
        count in 0usize..512,
        seed in prop::collection::vec(-32768i32..32768, 1..64),
    ) {
        let start = (start_whole << FRAC_BITS) | u64::from(start_frac & FRAC_MASK);
        let source = source_for(start, step, count, &seed);
        let mut dest = vec![0; count];
        let mut position = start;

        resample(&source, &mut position, step, GAIN_UNITY, &mut dest);

        prop_assert_eq!(position, start + count as u64 * u64::from(step));
    }

    /// Unity step at unity gain reproduces the source exactly.
    #[test]
    fn unity_round_trip(samples in prop::collection::vec(any::<i32>(), 0..1024)) {
        let mut dest = vec![0; samples.len()];
        let mut position = 0;
        resample(&samples, &mut position, FRAC_ONE, GAIN_UNITY, &mut dest);
        prop_assert_eq!(dest, samples);
    }

    /// Doubling the gain doubles every output sample, to within one LSB of
    /// truncation.
    #[test]
    fn gain_is_linear(
        step in (FRAC_ONE / 4)..(4 * FRAC_ONE),
        gain in 0i32..(2 * GAIN_UNITY),
        count in 1usize..256,
        seed in prop::collection::vec(-32768i32..32768, 1..64),
    ) {
        let source = source_for(0, step, count, &seed);
        let mut single = vec![0; count];
        let mut double = vec![0; count];
        let mut pos_a = 0;
        let mut pos_b = 0;

        resample(&source, &mut pos_a, step, gain, &mut single);
        resample(&source, &mut pos_b, step, gain * 2, &mut double);

        for (a, b) in single.iter().zip(&double) {
            let diff = i64::from(*b) - 2 * i64::from(*a);
            prop_assert!(
                (0..=1).contains(&diff),
                "gain {} step {:#x}: single {} double {}", gain, step, a, b
            );
        }
    }

    /// Interpolation and box filtering never leave the range of the source.
    #[test]
    fn converted_samples_stay_within_source_range(
        step in 1u32..(4 * FRAC_ONE),
        count in 1usize..256,
        seed in prop::collection::vec(-32768i32..32768, 1..64),
    ) {
        let source = source_for(0, step, count, &seed);
        let lo = *source.iter().min().unwrap();
        let hi = *source.iter().max().unwrap();
        let mut dest = vec![0; count];
        let mut position = 0;

        resample(&source, &mut position, step, GAIN_UNITY, &mut dest);

        for &sample in &dest {
            prop_assert!(lo <= sample && sample <= hi, "{} outside {}..={}", sample, lo, hi);
        }
    }

    /// A two-stream chain at any rate pair delivers every requested sample.
    #[test]
    fn chain_delivers_requested_count(
        upstream in 1000u32..96000,
        downstream in 1000u32..96000,
        count in 1usize..1000,
    ) {
        let mut graph = StreamGraph::new(60.0).unwrap();
        let src = graph.create(0, 1, upstream, |_: &[&[i32]], out: &mut [&mut [i32]], n: usize| {
            out[0][..n].fill(1000);
        });
        let dst = graph.create(1, 1, downstream, Mixer);
        graph.set_input(dst, 0, Some(src), 0, 1.0).unwrap();

        let wanted = count.min(downstream as usize);
        let samples = graph.consume_output(dst, 0, wanted).unwrap();
        prop_assert_eq!(samples.len(), wanted);
        prop_assert!(samples.iter().all(|&s| s == 1000));
    }
}
