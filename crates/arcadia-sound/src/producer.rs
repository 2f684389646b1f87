//! Sample producers: the per-stream generation callback.
//!
//! A [`SampleProducer`] is invoked once its stream's inputs are up to date. It
//! receives one slice per input (already rate-converted and gain-scaled) and
//! one zeroed slice per output, all exactly `samples` long.
//!
//! Closures with the signature
//! `FnMut(&[&[i32]], &mut [&mut [i32]], usize)` implement the trait directly.
//! A handful of common producers are provided: [`Mixer`], [`Tone`], [`Noise`]
//! and [`Silence`].

use crate::fixed::saturate;

/// Fills output buffers from up-to-date input buffers.
pub trait SampleProducer {
    /// Generates `samples` samples into every output slice.
    fn generate(&mut self, inputs: &[&[i32]], outputs: &mut [&mut [i32]], samples: usize);

    /// Called when a pending sample rate change commits at a frame boundary.
    fn sample_rate_changed(&mut self, _sample_rate: u32) {}
}

impl<F> SampleProducer for F
where
    F: FnMut(&[&[i32]], &mut [&mut [i32]], usize),
{
    fn generate(&mut self, inputs: &[&[i32]], outputs: &mut [&mut [i32]], samples: usize) {
        self(inputs, outputs, samples);
    }
}

/// Sums every input into every output, saturating at the `i32` range.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mixer;

impl SampleProducer for Mixer {
    fn generate(&mut self, inputs: &[&[i32]], outputs: &mut [&mut [i32]], samples: usize) {
        for i in 0..samples {
            let sum: i64 = inputs.iter().map(|input| i64::from(input[i])).sum();
            let value = saturate(sum);
            for output in outputs.iter_mut() {
                output[i] = value;
            }
        }
    }
}

/// Writes silence to every output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl SampleProducer for Silence {
    fn generate(&mut self, _inputs: &[&[i32]], outputs: &mut [&mut [i32]], _samples: usize) {
        for output in outputs.iter_mut() {
            output.fill(0);
        }
    }
}

/// Square-wave oscillator with a 50% duty cycle.
///
/// Phase is kept in 32-bit fixed point so the period stays exact across
/// arbitrarily long runs.
#[derive(Debug, Clone)]
pub struct Tone {
    frequency: f64,
    amplitude: i32,
    phase: u32,
    increment: u32,
}

impl Tone {
    /// Creates a tone at `frequency` Hz for a stream running at `sample_rate`.
    pub fn new(frequency: f64, amplitude: i32, sample_rate: u32) -> Self {
        let mut tone = Self {
            frequency,
            amplitude,
            phase: 0,
            increment: 0,
        };
        tone.sample_rate_changed(sample_rate);
        tone
    }

    /// Oscillator frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

impl SampleProducer for Tone {
    fn generate(&mut self, _inputs: &[&[i32]], outputs: &mut [&mut [i32]], samples: usize) {
        for i in 0..samples {
            let value = if self.phase < 0x8000_0000 {
                self.amplitude
            } else {
                -self.amplitude
            };
            for output in outputs.iter_mut() {
                output[i] = value;
            }
            self.phase = self.phase.wrapping_add(self.increment);
        }
    }

    fn sample_rate_changed(&mut self, sample_rate: u32) {
        self.increment = if sample_rate == 0 {
            0
        } else {
            (self.frequency / f64::from(sample_rate) * 4_294_967_296.0) as u32
        };
    }
}

/// White noise from a 15-bit linear feedback shift register.
///
/// The register clocks at `frequency` Hz; between clocks the output holds.
#[derive(Debug, Clone)]
pub struct Noise {
    frequency: f64,
    amplitude: i32,
    lfsr: u16,
    phase: u32,
    increment: u32,
}

impl Noise {
    /// Creates a noise source clocked at `frequency` Hz.
    pub fn new(frequency: f64, amplitude: i32, sample_rate: u32) -> Self {
        let mut noise = Self {
            frequency,
            amplitude,
            lfsr: 0x7fff,
            phase: 0,
            increment: 0,
        };
        noise.sample_rate_changed(sample_rate);
        noise
    }

    fn clock(&mut self) {
        let bit = (self.lfsr ^ (self.lfsr >> 1)) & 1;
        self.lfsr = (self.lfsr >> 1) | (bit << 14);
    }
}

impl SampleProducer for Noise {
    fn generate(&mut self, _inputs: &[&[i32]], outputs: &mut [&mut [i32]], samples: usize) {
        for i in 0..samples {
            let value = if self.lfsr & 1 == 1 {
                self.amplitude
            } else {
                -self.amplitude
            };
            for output in outputs.iter_mut() {
                output[i] = value;
            }
            let (next, wrapped) = self.phase.overflowing_add(self.increment);
            self.phase = next;
            if wrapped {
                self.clock();
            }
        }
    }

    fn sample_rate_changed(&mut self, sample_rate: u32) {
        let ratio = if sample_rate == 0 {
            0.0
        } else {
            (self.frequency / f64::from(sample_rate)).min(1.0)
        };
        self.increment = (ratio * f64::from(u32::MAX)) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(producer: &mut dyn SampleProducer, inputs: &[&[i32]], samples: usize) -> Vec<i32> {
        let mut out = vec![0; samples];
        {
            let mut outputs: [&mut [i32]; 1] = [&mut out];
            producer.generate(inputs, &mut outputs, samples);
        }
        out
    }

    #[test]
    fn mixer_sums_inputs() {
        let a = [1, 2, 3];
        let b = [10, 20, i32::MAX];
        let out = run(&mut Mixer, &[&a, &b], 3);
        assert_eq!(out, vec![11, 22, i32::MAX]);
    }

    #[test]
    fn tone_period_matches_frequency() {
        let mut tone = Tone::new(100.0, 1000, 800);
        let out = run(&mut tone, &[], 16);
        assert_eq!(&out[..4], &[1000; 4]);
        assert_eq!(&out[4..8], &[-1000; 4]);
        assert_eq!(&out[8..12], &[1000; 4]);
    }

    #[test]
    fn tone_follows_rate_change() {
        let mut tone = Tone::new(100.0, 1, 400);
        tone.sample_rate_changed(800);
        let out = run(&mut tone, &[], 8);
        assert_eq!(out, vec![1, 1, 1, 1, -1, -1, -1, -1]);
    }

    #[test]
    fn noise_is_bipolar() {
        let mut noise = Noise::new(44100.0, 50, 44100);
        let out = run(&mut noise, &[], 256);
        assert!(out.iter().all(|&s| s == 50 || s == -50));
        assert!(out.contains(&50) && out.contains(&-50));
    }

    #[test]
    fn closures_are_producers() {
        let mut counter = 0;
        let mut producer = |_: &[&[i32]], outputs: &mut [&mut [i32]], samples: usize| {
            for i in 0..samples {
                outputs[0][i] = counter;
                counter += 1;
            }
        };
        let out = run(&mut producer, &[], 3);
        assert_eq!(out, vec![0, 1, 2]);
    }
}
