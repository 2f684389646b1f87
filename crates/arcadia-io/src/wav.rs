//! WAV file reading and writing.
//!
//! Stream samples are 16-bit scaled integers carried in `i32` (anything past
//! the 16-bit range is headroom). Writing clamps to 16 bits and shifts up to
//! the file's bit depth; reading shifts back down.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

const SAMPLE_BITS: u16 = 16;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len());
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample: 16, 24 or 32.
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// Mono 16-bit at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Set the bit depth.
    pub fn with_bits(mut self, bits_per_sample: u16) -> Self {
        self.bits_per_sample = bits_per_sample;
        self
    }

    fn check_bits(&self) -> Result<()> {
        match self.bits_per_sample {
            16 | 24 | 32 => Ok(()),
            other => Err(Error::UnsupportedBitDepth(other)),
        }
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 16,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: SampleFormat::Int,
        }
    }
}

/// Clamps a stream sample to 16 bits and widens it to `bits`.
fn encode(sample: i32, bits: u16) -> i32 {
    let clamped = sample.clamp(i32::from(i16::MIN), i32::from(i16::MAX));
    clamped << (bits - SAMPLE_BITS)
}

fn decode(value: i32, bits: u16) -> i32 {
    if bits >= SAMPLE_BITS {
        value >> (bits - SAMPLE_BITS)
    } else {
        value << (SAMPLE_BITS - bits)
    }
}

/// Reads every sample, interleaved, as 16-bit scaled integers.
fn read_interleaved<P: AsRef<Path>>(path: P) -> Result<(Vec<i32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());

    let samples = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v * 32768.0).clamp(-32768.0, 32767.0) as i32))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| decode(v, bits)))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok((samples, spec))
}

/// Read a WAV file as 16-bit scaled samples.
///
/// Multi-channel files are mixed down to mono by averaging channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<i32>, WavSpec)> {
    let (samples, spec) = read_interleaved(path)?;
    let channels = usize::from(spec.channels.max(1));

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| {
                let sum: i64 = chunk.iter().map(|&s| i64::from(s)).sum();
                (sum / channels as i64) as i32
            })
            .collect()
    } else {
        samples
    };

    Ok((mono, spec))
}

/// Write mono samples to a WAV file.
///
/// `spec.channels` is ignored; the file is always mono.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[i32], spec: WavSpec) -> Result<()> {
    spec.check_bits()?;
    let mono = WavSpec { channels: 1, ..spec };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(mono))?;

    for &sample in samples {
        writer.write_sample(encode(sample, spec.bits_per_sample))?;
    }

    writer.finalize()?;
    tracing::debug!(
        "wav_write: {} samples at {} Hz, {} bit",
        samples.len(),
        spec.sample_rate,
        spec.bits_per_sample
    );
    Ok(())
}

/// A pair of equal-length channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<i32>,
    /// Right channel.
    pub right: Vec<i32>,
}

impl StereoSamples {
    /// Pairs two channels, truncating the longer one.
    pub fn new(mut left: Vec<i32>, mut right: Vec<i32>) -> Self {
        let len = left.len().min(right.len());
        left.truncate(len);
        right.truncate(len);
        Self { left, right }
    }

    /// Duplicates a mono channel to both sides.
    pub fn from_mono(samples: Vec<i32>) -> Self {
        Self {
            left: samples.clone(),
            right: samples,
        }
    }

    /// Splits `L R L R ...`; a trailing odd sample is dropped.
    pub fn from_interleaved(samples: &[i32]) -> Self {
        let (left, right) = samples
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .unzip();
        Self { left, right }
    }

    /// Interleaves as `L R L R ...`.
    pub fn to_interleaved(&self) -> Vec<i32> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Check if both channels are empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Read a WAV file as stereo.
///
/// Mono files are duplicated to both channels. Files with more than two
/// channels keep the first two.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let (samples, spec) = read_interleaved(path)?;

    let stereo = match spec.channels {
        0 | 1 => StereoSamples::from_mono(samples),
        2 => StereoSamples::from_interleaved(&samples),
        channels => {
            let (left, right) = samples
                .chunks_exact(usize::from(channels))
                .map(|frame| (frame[0], frame[1]))
                .unzip();
            StereoSamples { left, right }
        }
    };

    Ok((stereo, spec))
}

/// Write stereo samples to a WAV file.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    spec.check_bits()?;
    let stereo = WavSpec {
        channels: 2,
        ..spec
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(stereo))?;

    for (&l, &r) in samples.left.iter().zip(&samples.right) {
        writer.write_sample(encode(l, spec.bits_per_sample))?;
        writer.write_sample(encode(r, spec.bits_per_sample))?;
    }

    writer.finalize()?;
    Ok(())
}
