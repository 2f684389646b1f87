//! Stream configuration types.

use serde::{Deserialize, Serialize};

use arcadia_sound::{Mixer, Noise, SampleProducer, Silence, Tone};

/// What a stream generates.
///
/// Serialized as an inline table tagged by `type`:
///
/// ```toml
/// kind = { type = "tone", frequency = 440.0, amplitude = 8000 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProducerKind {
    /// Square wave.
    Tone {
        /// Frequency in Hz.
        frequency: f64,
        /// Peak amplitude.
        amplitude: i32,
    },
    /// LFSR noise clocked at `frequency`.
    Noise {
        /// Shift register clock in Hz.
        frequency: f64,
        /// Peak amplitude.
        amplitude: i32,
    },
    /// Zeros.
    Silence,
    /// Sum of `inputs` inputs.
    Mixer {
        /// Number of inputs.
        inputs: usize,
    },
}

impl ProducerKind {
    /// Inputs a stream of this kind is created with.
    pub fn input_count(&self) -> usize {
        match self {
            Self::Mixer { inputs } => *inputs,
            _ => 0,
        }
    }

    /// Outputs a stream of this kind is created with.
    pub fn output_count(&self) -> usize {
        1
    }

    /// Short name used in listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tone { .. } => "tone",
            Self::Noise { .. } => "noise",
            Self::Silence => "silence",
            Self::Mixer { .. } => "mixer",
        }
    }

    /// Instantiates the producer for a stream running at `sample_rate`.
    pub fn producer(&self, sample_rate: u32) -> Box<dyn SampleProducer> {
        match *self {
            Self::Tone {
                frequency,
                amplitude,
            } => Box::new(Tone::new(frequency, amplitude, sample_rate)),
            Self::Noise {
                frequency,
                amplitude,
            } => Box::new(Noise::new(frequency, amplitude, sample_rate)),
            Self::Silence => Box::new(Silence),
            Self::Mixer { .. } => Box::new(Mixer),
        }
    }
}

/// One input connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Tag of the upstream stream.
    pub source: String,

    /// Output index on the upstream stream.
    #[serde(default)]
    pub output: usize,

    /// Linear input gain.
    #[serde(default = "unity")]
    pub gain: f32,
}

impl InputConfig {
    /// Connects to output 0 of `source` at unity gain.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: 0,
            gain: 1.0,
        }
    }

    /// Set the upstream output index.
    pub fn with_output(mut self, output: usize) -> Self {
        self.output = output;
        self
    }

    /// Set the input gain.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }
}

/// One stream of a machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamConfig {
    /// Owner tag; unique within a machine.
    pub tag: String,

    /// Sample rate in Hz.
    pub sample_rate: u32,

    /// What the stream generates.
    pub kind: ProducerKind,

    /// Linear gain of the stream's output.
    #[serde(default = "unity")]
    pub output_gain: f32,

    /// Input connections, in input index order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputConfig>,
}

fn unity() -> f32 {
    1.0
}

impl StreamConfig {
    /// Create a stream configuration with no inputs wired.
    pub fn new(tag: impl Into<String>, sample_rate: u32, kind: ProducerKind) -> Self {
        Self {
            tag: tag.into(),
            sample_rate,
            kind,
            output_gain: 1.0,
            inputs: Vec::new(),
        }
    }

    /// Add an input connection.
    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.inputs.push(input);
        self
    }

    /// Set the output gain.
    pub fn with_output_gain(mut self, gain: f32) -> Self {
        self.output_gain = gain;
        self
    }
}
