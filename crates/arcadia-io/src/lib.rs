//! Audio output for arcadia stream graphs.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for integer sample
//!   streams, plus stereo variants
//! - **Rendering**: [`render`] and [`render_stereo`] drive a
//!   [`StreamGraph`](arcadia_sound::StreamGraph) frame by frame and collect
//!   what a stream produces
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcadia_io::{WavSpec, render, write_wav};
//! use arcadia_sound::{StreamGraph, Tone};
//!
//! let mut graph = StreamGraph::new(60.0)?;
//! let tone = graph.create(0, 1, 48000, Tone::new(440.0, 8000, 48000));
//!
//! // One second of audio
//! let samples = render(&mut graph, tone, 60, |_| {})?;
//! write_wav("tone.wav", &samples, WavSpec::new(48000))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod render;
mod wav;

pub use render::{render, render_stereo};
pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, read_wav_stereo,
    write_wav, write_wav_stereo,
};

use arcadia_sound::{StreamError, StreamId};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The stream graph rejected a request.
    #[error("stream graph error: {0}")]
    Stream(#[from] StreamError),

    /// Stereo channels must run at the same rate.
    #[error("channel rates differ: {left} Hz ({left_stream}) vs {right} Hz ({right_stream})")]
    RateMismatch {
        /// Left channel stream.
        left_stream: StreamId,
        /// Left channel rate.
        left: u32,
        /// Right channel stream.
        right_stream: StreamId,
        /// Right channel rate.
        right: u32,
    },

    /// The requested bit depth is not 16, 24 or 32.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
