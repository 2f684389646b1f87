//! Stream nodes, their inputs and outputs.
//!
//! A stream owns a fixed number of inputs and outputs, chosen at creation.
//! Each [`Input`] reads from at most one upstream output through its own
//! resample buffer; each [`Output`] keeps the samples its producer wrote until
//! every dependent input has moved past them.

use crate::fixed::{self, GAIN_UNITY};
use crate::producer::SampleProducer;
use crate::ring::SampleRing;

/// Handle to a stream inside a [`StreamGraph`](crate::StreamGraph).
///
/// Handles are assigned sequentially and never reused; streams live until
/// the graph is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub(crate) u32);

impl StreamId {
    /// Returns the raw creation index.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for StreamId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Location of an output: the producing stream and its output index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputRef {
    /// Producing stream.
    pub stream: StreamId,
    /// Output index on that stream.
    pub output: usize,
}

/// Location of an input: the consuming stream and its input index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputRef {
    /// Consuming stream.
    pub stream: StreamId,
    /// Input index on that stream.
    pub input: usize,
}

/// One input of a stream.
pub(crate) struct Input {
    /// Upstream output, `None` when the input reads silence.
    pub source: Option<OutputRef>,
    /// Rate-converted samples awaiting the producer.
    pub resample: SampleRing,
    /// Fixed-point read position in the source output buffer.
    pub source_frac: u64,
    /// Fixed-point advance per converted sample.
    pub step: u32,
    /// 8-bit fixed-point gain.
    pub gain: i32,
}

impl Input {
    pub fn new(capacity: usize) -> Self {
        Self {
            source: None,
            resample: SampleRing::new(capacity),
            source_frac: 0,
            step: fixed::FRAC_ONE,
            gain: GAIN_UNITY,
        }
    }
}

/// One output of a stream.
pub(crate) struct Output {
    /// Generated samples; `write_pos` is the generation cursor and
    /// `read_pos` the slowest reader.
    pub buffer: SampleRing,
    /// Inputs currently wired to this output.
    pub dependents: Vec<InputRef>,
    /// 8-bit fixed-point gain applied by every reader.
    pub gain: i32,
}

impl Output {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: SampleRing::new(capacity),
            dependents: Vec::new(),
            gain: GAIN_UNITY,
        }
    }
}

/// A node of the stream graph.
pub(crate) struct Stream {
    pub tag: String,
    pub index: u32,
    pub sample_rate: u32,
    pub pending_sample_rate: u32,
    /// Samples per frame in `FRAC_BITS` fixed point.
    pub samples_per_frame_frac: u64,
    /// Fractional sample carried over from previous frames.
    pub frame_carry: u64,
    /// Samples generated since the last frame boundary.
    pub generated_this_frame: u64,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub producer: Box<dyn SampleProducer>,
}

impl Stream {
    /// Samples owed by the end of the current frame at `fraction` elapsed.
    pub fn frame_target(&self, fraction: f64) -> u64 {
        let elapsed = (self.samples_per_frame_frac as f64 * fraction) as u64;
        (self.frame_carry + elapsed) >> fixed::FRAC_BITS
    }
}

/// Read-only view of an input's cursors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputState {
    /// Upstream output, if connected.
    pub source: Option<OutputRef>,
    /// Resample buffer write cursor.
    pub resample_in_pos: usize,
    /// Resample buffer read cursor.
    pub resample_out_pos: usize,
    /// Fixed-point position in the upstream output buffer.
    pub source_frac: u64,
    /// Fixed-point step rate.
    pub step: u32,
    /// 8-bit fixed-point gain.
    pub gain: i32,
}

impl InputState {
    pub(crate) fn of(input: &Input) -> Self {
        Self {
            source: input.source,
            resample_in_pos: input.resample.write_pos(),
            resample_out_pos: input.resample.read_pos(),
            source_frac: input.source_frac,
            step: input.step,
            gain: input.gain,
        }
    }

    /// Whole-sample position in the upstream output buffer.
    pub fn source_pos(&self) -> usize {
        fixed::whole(self.source_frac)
    }
}

/// Read-only view of an output's cursors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputState {
    /// Generation cursor.
    pub cur_in_pos: usize,
    /// Slowest-reader cursor.
    pub cur_out_pos: usize,
    /// Number of inputs wired to this output.
    pub dependents: usize,
    /// 8-bit fixed-point gain.
    pub gain: i32,
}

impl OutputState {
    pub(crate) fn of(output: &Output) -> Self {
        Self {
            cur_in_pos: output.buffer.write_pos(),
            cur_out_pos: output.buffer.read_pos(),
            dependents: output.dependents.len(),
            gain: output.gain,
        }
    }

    /// Samples generated but not yet read.
    pub fn available(&self) -> usize {
        self.cur_in_pos - self.cur_out_pos
    }
}
