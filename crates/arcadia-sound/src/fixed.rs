//! Fixed-point vocabulary shared by the stream graph and the resampler.
//!
//! Positions and rate ratios use a [`FRAC_BITS`]-bit fractional part; gains use
//! a [`GAIN_BITS`]-bit fractional part with [`GAIN_UNITY`] meaning 1.0. All
//! shifts that drop precision truncate (arithmetic shift), never round.
//!
//! # Example
//!
//! ```rust
//! use arcadia_sound::fixed::{self, FRAC_ONE, GAIN_UNITY};
//!
//! assert_eq!(fixed::step_rate(44100, 22050), 2 * FRAC_ONE);
//! assert_eq!(fixed::gain_from_f32(1.0), GAIN_UNITY);
//! assert_eq!(fixed::apply_gain(1000, GAIN_UNITY / 2), 500);
//! ```

/// Number of fractional bits in a sample position or step rate.
pub const FRAC_BITS: u32 = 14;

/// The fixed-point representation of 1.0 for positions and step rates.
pub const FRAC_ONE: u32 = 1 << FRAC_BITS;

/// Mask selecting the fractional part of a position.
pub const FRAC_MASK: u32 = FRAC_ONE - 1;

/// Number of fractional bits in a gain multiplier.
pub const GAIN_BITS: u32 = 8;

/// Unity gain (`0x100`).
pub const GAIN_UNITY: i32 = 1 << GAIN_BITS;

/// Largest gain accepted from floating point callers (256.0).
pub const GAIN_MAX: i32 = GAIN_UNITY << GAIN_BITS;

/// Converts a floating point gain to the fixed-point multiplier.
///
/// Negative and non-finite gains become zero; values above 256.0 saturate.
pub fn gain_from_f32(gain: f32) -> i32 {
    if !gain.is_finite() || gain <= 0.0 {
        return 0;
    }
    let scaled = gain * GAIN_UNITY as f32;
    if scaled >= GAIN_MAX as f32 {
        GAIN_MAX
    } else {
        scaled as i32
    }
}

/// Converts a fixed-point gain back to floating point.
#[inline]
pub fn gain_to_f32(gain: i32) -> f32 {
    gain as f32 / GAIN_UNITY as f32
}

/// Combines an input gain with its source output gain.
#[inline]
pub fn combine_gains(input_gain: i32, output_gain: i32) -> i32 {
    ((i64::from(input_gain) * i64::from(output_gain)) >> GAIN_BITS) as i32
}

/// Scales a sample by a fixed-point gain, truncating toward negative infinity.
#[inline]
pub fn apply_gain(sample: i32, gain: i32) -> i32 {
    saturate((i64::from(sample) * i64::from(gain)) >> GAIN_BITS)
}

/// Clamps a wide accumulator into the `i32` sample range.
#[inline]
pub fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Computes the per-output-sample advance through an upstream buffer.
///
/// The result is `(upstream << FRAC_BITS) / downstream`. A zero downstream
/// rate yields a zero step, so a stopped stream never walks its sources.
pub fn step_rate(upstream_rate: u32, downstream_rate: u32) -> u32 {
    if downstream_rate == 0 {
        return 0;
    }
    let step = (u64::from(upstream_rate) << FRAC_BITS) / u64::from(downstream_rate);
    step.min(u64::from(u32::MAX)) as u32
}

/// Samples per video frame for a stream, in `FRAC_BITS` fixed point.
pub fn samples_per_frame_frac(sample_rate: u32, refresh_rate: f64) -> u64 {
    if refresh_rate <= 0.0 {
        return 0;
    }
    (f64::from(sample_rate) * f64::from(FRAC_ONE) / refresh_rate) as u64
}

/// Returns the integer sample index of a fixed-point position.
#[inline]
pub fn whole(position: u64) -> usize {
    (position >> FRAC_BITS) as usize
}

/// Returns a fixed-point position for an integer sample index.
#[inline]
pub fn to_frac(index: usize) -> u64 {
    (index as u64) << FRAC_BITS
}
