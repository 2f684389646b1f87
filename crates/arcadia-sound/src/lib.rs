//! Arcadia Sound - stream mixing and resampling for machine emulation
//!
//! Sound chips register streams: nodes with a fixed number of inputs and
//! outputs, a sample rate, and a producer that fills output buffers from
//! input buffers. Streams are wired into a directed acyclic graph and
//! generated lazily: asking any stream for samples pulls exactly what it
//! needs from everything upstream, converting sample rates on the way.
//!
//! # Core Abstractions
//!
//! - [`StreamGraph`] - owns all streams of one machine; creation, wiring,
//!   generation and once-per-frame maintenance
//! - [`SampleProducer`] - the per-stream generation callback (closures work)
//! - [`resample()`](resample::resample) - three-regime fixed-point rate converter
//! - [`SampleRing`] - sample buffer with tail-preserving compaction
//! - [`FrameClock`] - "how far into the frame are we" time source
//!
//! ## Producers
//!
//! - [`Mixer`] - sums all inputs
//! - [`Tone`] - square wave
//! - [`Noise`] - LFSR noise
//! - [`Silence`] - zeros
//!
//! # Numeric Contract
//!
//! Positions and step rates carry [`FRAC_BITS`](fixed::FRAC_BITS) fractional
//! bits; gains carry 8 (`0x100` is unity). Conversions truncate.
//!
//! # Example
//!
//! ```rust
//! use arcadia_sound::{StreamGraph, Tone};
//!
//! let mut graph = StreamGraph::new(60.0)?;
//! let tone = graph.create(0, 1, 48000, Tone::new(1000.0, 8000, 48000));
//!
//! // Once per emulated frame:
//! graph.frame_update();
//! let frame = graph.consume_output(tone, 0, 800)?;
//! assert_eq!(frame.len(), 800);
//! # Ok::<(), arcadia_sound::StreamError>(())
//! ```

pub mod clock;
pub mod error;
pub mod fixed;
pub mod graph;
pub mod producer;
pub mod resample;
pub mod ring;
pub mod stream;

pub use clock::{FrameClock, ManualClock};
pub use error::StreamError;
pub use graph::{DEFAULT_REFRESH_RATE, StreamGraph};
pub use producer::{Mixer, Noise, SampleProducer, Silence, Tone};
pub use resample::{Regime, required_source_end, resample};
pub use ring::SampleRing;
pub use stream::{InputRef, InputState, OutputRef, OutputState, StreamId};
