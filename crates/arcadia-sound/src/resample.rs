//! Fixed-point sample-rate conversion between a source output and an input.
//!
//! The converter walks a fixed-point position through the source buffer by
//! `step` per produced sample, where `step` is the upstream/downstream rate
//! ratio in [`FRAC_BITS`] fixed point. Three regimes are selected by
//! comparing `step` to [`FRAC_ONE`]:
//!
//! - [`Regime::Unity`] copies one source sample per output sample.
//! - [`Regime::Upsample`] linearly interpolates between the two nearest
//!   source samples.
//! - [`Regime::Downsample`] box-filters every source sample the output
//!   sample spans, weighting the partial samples at each edge by their
//!   overlap. Weights are reduced to 8 fractional bits to keep the
//!   accumulator narrow.
//!
//! Every regime writes exactly `dest.len()` samples and advances the position
//! by exactly `dest.len() * step`. Gain is applied last, truncating.

use crate::fixed::{FRAC_BITS, FRAC_MASK, FRAC_ONE, apply_gain, whole};

/// Fractional bits kept by the downsampling weights.
const BOX_WEIGHT_BITS: u32 = 8;

/// Shift from a full-precision fraction to a box weight.
const BOX_REDUCE: u32 = FRAC_BITS - BOX_WEIGHT_BITS;

/// Weight of one whole source sample in the box filter.
const BOX_WHOLE: i64 = 1 << BOX_WEIGHT_BITS;

/// Conversion strategy chosen from the step rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Source and destination run at the same rate.
    Unity,
    /// More destination samples than source samples.
    Upsample,
    /// Fewer destination samples than source samples.
    Downsample,
}

impl Regime {
    /// Selects the regime for a fixed-point step.
    #[inline]
    pub fn for_step(step: u32) -> Self {
        match step.cmp(&FRAC_ONE) {
            core::cmp::Ordering::Equal => Self::Unity,
            core::cmp::Ordering::Less => Self::Upsample,
            core::cmp::Ordering::Greater => Self::Downsample,
        }
    }
}

/// Exclusive end index of the source samples needed to produce `count`
/// samples starting at `position`.
///
/// Interpolation reads one sample past the last position it lands on, and
/// the box filter reads up to the sample containing its final edge, so both
/// need one sample beyond the whole part of their end position.
pub fn required_source_end(position: u64, step: u32, count: usize) -> usize {
    if count == 0 {
        return whole(position);
    }
    let wide = u64::from(step);
    match Regime::for_step(step) {
        Regime::Unity => whole(position) + count,
        Regime::Upsample => whole(position + (count as u64 - 1) * wide) + 2,
        Regime::Downsample => whole(position + count as u64 * wide) + 1,
    }
}

/// Reads a source sample, treating anything not yet written as silence.
#[inline]
fn fetch(source: &[i32], index: usize) -> i64 {
    source.get(index).copied().map_or(0, i64::from)
}

/// Converts source samples into `dest`, advancing `position`.
///
/// `source` holds the upstream buffer from absolute index 0; `position` is an
/// absolute fixed-point index into it. `gain` is the combined input and
/// source gain in 8-bit fixed point.
pub fn resample(source: &[i32], position: &mut u64, step: u32, gain: i32, dest: &mut [i32]) {
    match Regime::for_step(step) {
        Regime::Unity => copy_unity(source, position, gain, dest),
        Regime::Upsample => interpolate(source, position, step, gain, dest),
        Regime::Downsample => box_filter(source, position, step, gain, dest),
    }
}

fn copy_unity(source: &[i32], position: &mut u64, gain: i32, dest: &mut [i32]) {
    let start = whole(*position);
    for (i, out) in dest.iter_mut().enumerate() {
        *out = apply_gain(fetch(source, start + i) as i32, gain);
    }
    *position += u64::from(FRAC_ONE) * dest.len() as u64;
}

fn interpolate(source: &[i32], position: &mut u64, step: u32, gain: i32, dest: &mut [i32]) {
    let mut pos = *position;
    for out in dest.iter_mut() {
        let index = whole(pos);
        let frac = i64::from(pos as u32 & FRAC_MASK);
        let a = fetch(source, index);
        let b = fetch(source, index + 1);
        let sample = (a * (i64::from(FRAC_ONE) - frac) + b * frac) >> FRAC_BITS;
        *out = apply_gain(sample as i32, gain);
        pos += u64::from(step);
    }
    *position = pos;
}

fn box_filter(source: &[i32], position: &mut u64, step: u32, gain: i32, dest: &mut [i32]) {
    let span = i64::from(step >> BOX_REDUCE);
    let mut pos = *position;
    for out in dest.iter_mut() {
        let mut index = whole(pos);
        let frac = pos as u32 & FRAC_MASK;

        // Leading edge, rounded up so the trailing weight never overshoots.
        let lead = i64::from((FRAC_ONE - frac + (1 << BOX_REDUCE) - 1) >> BOX_REDUCE);
        let mut acc = fetch(source, index) * lead;
        let mut remaining = span - lead;
        index += 1;

        while remaining > BOX_WHOLE {
            acc += fetch(source, index) * BOX_WHOLE;
            remaining -= BOX_WHOLE;
            index += 1;
        }
        if remaining > 0 {
            acc += fetch(source, index) * remaining;
        }

        *out = apply_gain((acc.div_euclid(span)) as i32, gain);
        pos += u64::from(step);
    }
    *position = pos;
}
