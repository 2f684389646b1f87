//! Error types for stream graph configuration.

use thiserror::Error;

use crate::stream::StreamId;

/// Configuration errors raised while building or rewiring a stream graph.
///
/// These indicate a bug in the calling device code rather than a runtime
/// condition; the graph is left unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// The handle does not belong to this graph.
    #[error("unknown stream {0}")]
    UnknownStream(StreamId),

    /// An input index beyond the stream's configured input count.
    #[error("stream {stream} has {count} inputs, input {index} requested")]
    InputOutOfRange {
        /// Stream being configured.
        stream: StreamId,
        /// Requested input index.
        index: usize,
        /// Inputs configured at creation.
        count: usize,
    },

    /// An output index beyond the stream's configured output count.
    #[error("stream {stream} has {count} outputs, output {index} requested")]
    OutputOutOfRange {
        /// Stream owning the output.
        stream: StreamId,
        /// Requested output index.
        index: usize,
        /// Outputs configured at creation.
        count: usize,
    },

    /// Wiring `upstream` into `stream` would make the graph cyclic.
    #[error("connecting {upstream} into {stream} would create a cycle")]
    CycleDetected {
        /// Stream whose input was being set.
        stream: StreamId,
        /// Upstream stream that already depends on `stream`.
        upstream: StreamId,
    },

    /// The presentation refresh rate must be positive and finite.
    #[error("invalid refresh rate {0} Hz")]
    FrameRate(f64),
}
