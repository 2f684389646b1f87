//! Machine validation.
//!
//! Every problem in a machine description is collected before any engine is
//! touched, so a bad file reports all of its mistakes at once.
//!
//! # Example
//!
//! ```rust
//! use arcadia_config::{InputConfig, MachineConfig, ProducerKind, StreamConfig, validate_machine};
//!
//! let machine = MachineConfig::new("broken").with_stream(
//!     StreamConfig::new("mix", 48000, ProducerKind::Mixer { inputs: 1 })
//!         .with_input(InputConfig::new("missing")),
//! );
//! assert!(validate_machine(&machine).is_err());
//! ```

use std::collections::HashMap;

use arcadia_palette::MAX_COLORS;
use thiserror::Error;

use crate::machine::MachineConfig;
use crate::palette_config::parse_color;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Refresh rate must be positive and finite.
    #[error("invalid refresh rate {0} Hz")]
    RefreshRate(f64),

    /// Two streams share a tag.
    #[error("duplicate stream tag '{0}'")]
    DuplicateTag(String),

    /// A stream runs at 0 Hz.
    #[error("stream '{0}' has a sample rate of zero")]
    ZeroSampleRate(String),

    /// More inputs wired than the stream kind has.
    #[error("stream '{stream}' wires {wired} inputs but has {inputs}")]
    TooManyInputs {
        /// Stream tag.
        stream: String,
        /// Inputs listed in the file.
        wired: usize,
        /// Inputs the stream kind provides.
        inputs: usize,
    },

    /// An input names a tag no stream has.
    #[error("stream '{stream}' reads from unknown stream '{source_tag}'")]
    UnknownSource {
        /// Stream tag.
        stream: String,
        /// Missing source tag.
        source_tag: String,
    },

    /// An input names an output the source does not have.
    #[error("stream '{stream}' reads output {output} of '{source_tag}', which has {outputs}")]
    OutputOutOfRange {
        /// Stream tag.
        stream: String,
        /// Source tag.
        source_tag: String,
        /// Requested output.
        output: usize,
        /// Outputs the source provides.
        outputs: usize,
    },

    /// A stream reads its own output.
    #[error("stream '{0}' reads from itself")]
    SelfInput(String),

    /// The render output names a tag no stream has.
    #[error("output stream '{0}' does not exist")]
    UnknownOutput(String),

    /// The machine has no streams.
    #[error("machine has no streams")]
    NoStreams,

    /// The expanded palette is too large.
    #[error("palette needs {requested} pens, at most {max} are available", max = MAX_COLORS)]
    PaletteTooLarge {
        /// Pens after shadow/highlight expansion.
        requested: usize,
    },

    /// More initial pen colors than pens.
    #[error("palette lists {listed} pen colors but has {total} pens")]
    TooManyPens {
        /// Colors listed.
        listed: usize,
        /// Pens available.
        total: usize,
    },

    /// A pen color is not `#rrggbb`.
    #[error("pen {pen}: invalid color '{value}'")]
    InvalidColor {
        /// Pen index.
        pen: usize,
        /// Offending text.
        value: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks a machine description without instantiating it.
pub fn validate_machine(machine: &MachineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !(machine.refresh_rate.is_finite() && machine.refresh_rate > 0.0) {
        errors.push(ValidationError::RefreshRate(machine.refresh_rate));
    }
    if machine.streams.is_empty() {
        errors.push(ValidationError::NoStreams);
    }

    let mut outputs_by_tag: HashMap<&str, usize> = HashMap::new();
    for stream in &machine.streams {
        if outputs_by_tag
            .insert(&stream.tag, stream.kind.output_count())
            .is_some()
        {
            errors.push(ValidationError::DuplicateTag(stream.tag.clone()));
        }
        if stream.sample_rate == 0 {
            errors.push(ValidationError::ZeroSampleRate(stream.tag.clone()));
        }
    }

    for stream in &machine.streams {
        let inputs = stream.kind.input_count();
        if stream.inputs.len() > inputs {
            errors.push(ValidationError::TooManyInputs {
                stream: stream.tag.clone(),
                wired: stream.inputs.len(),
                inputs,
            });
        }
        for input in &stream.inputs {
            if input.source == stream.tag {
                errors.push(ValidationError::SelfInput(stream.tag.clone()));
                continue;
            }
            match outputs_by_tag.get(input.source.as_str()) {
                None => errors.push(ValidationError::UnknownSource {
                    stream: stream.tag.clone(),
                    source_tag: input.source.clone(),
                }),
                Some(&outputs) if input.output >= outputs => {
                    errors.push(ValidationError::OutputOutOfRange {
                        stream: stream.tag.clone(),
                        source_tag: input.source.clone(),
                        output: input.output,
                        outputs,
                    });
                }
                Some(_) => {}
            }
        }
    }

    if let Some(output) = &machine.output
        && !outputs_by_tag.contains_key(output.as_str())
    {
        errors.push(ValidationError::UnknownOutput(output.clone()));
    }

    if let Some(palette) = &machine.palette {
        let total = palette.layout().total_colors();
        if total > MAX_COLORS {
            errors.push(ValidationError::PaletteTooLarge { requested: total });
        } else if palette.pens.len() > total {
            errors.push(ValidationError::TooManyPens {
                listed: palette.pens.len(),
                total,
            });
        }
        for (pen, value) in palette.pens.iter().enumerate() {
            if parse_color(value).is_none() {
                errors.push(ValidationError::InvalidColor {
                    pen,
                    value: value.clone(),
                });
            }
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
