//! Instantiating machines from their descriptions.

use arcadia_palette::Palette;
use arcadia_sound::fixed::apply_gain;
use arcadia_sound::{StreamGraph, StreamId};

use crate::error::ConfigError;
use crate::machine::MachineConfig;
use crate::palette_config::{PaletteConfig, parse_color};
use crate::validation::{ValidationError, validate_machine};

/// A running machine: its stream graph, the stream rendered as audio, and
/// its palette.
pub struct Machine {
    name: String,
    graph: StreamGraph,
    output: StreamId,
    palette: Option<Palette>,
}

impl Machine {
    /// Machine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stream graph.
    pub fn graph(&self) -> &StreamGraph {
        &self.graph
    }

    /// Mutable access to the stream graph.
    pub fn graph_mut(&mut self) -> &mut StreamGraph {
        &mut self.graph
    }

    /// Stream rendered as the machine's audio output.
    pub fn output(&self) -> StreamId {
        self.output
    }

    /// Sample rate of the output stream.
    pub fn output_rate(&self) -> u32 {
        self.graph.sample_rate(self.output).unwrap_or(0)
    }

    /// The palette, still in its initialization phase so drivers can attach
    /// change notifiers.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Mutable access to the palette.
    pub fn palette_mut(&mut self) -> Option<&mut Palette> {
        self.palette.as_mut()
    }

    /// Runs one emulated frame and returns the output samples it produced,
    /// scaled by the output stream's gain.
    ///
    /// `frame_update` runs first, so the samples returned cover everything
    /// generated up to the frame boundary.
    pub fn render_frame(&mut self) -> Result<Vec<i32>, ConfigError> {
        self.graph.frame_update();
        let state = self.graph.output_state(self.output, 0)?;
        let samples = self.graph.consume_output(self.output, 0, state.available())?;
        Ok(samples.iter().map(|&s| apply_gain(s, state.gain)).collect())
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("name", &self.name)
            .field("streams", &self.graph.stream_count())
            .field("output", &self.output)
            .field("palette", &self.palette.is_some())
            .finish()
    }
}

impl MachineConfig {
    /// Validates the description and instantiates it.
    pub fn build(&self) -> Result<Machine, ConfigError> {
        validate_machine(self)?;

        let graph = self.build_sound()?;
        let output_tag = self.output_tag().ok_or(ValidationError::NoStreams)?;
        let output = graph
            .find(output_tag, 0)
            .ok_or_else(|| ValidationError::UnknownOutput(output_tag.to_owned()))?;
        let palette = self.palette.as_ref().map(build_palette).transpose()?;

        tracing::info!(
            "machine_build: '{}' streams={} output={output_tag} palette={}",
            self.name,
            graph.stream_count(),
            palette.as_ref().map_or(0, Palette::total_colors)
        );

        Ok(Machine {
            name: self.name.clone(),
            graph,
            output,
            palette,
        })
    }

    /// Creates every stream, then wires inputs in a second pass so streams
    /// may read from streams declared after them.
    fn build_sound(&self) -> Result<StreamGraph, ConfigError> {
        let mut graph = StreamGraph::new(self.refresh_rate)?;

        let mut ids = Vec::with_capacity(self.streams.len());
        for stream in &self.streams {
            graph.set_tag(stream.tag.as_str());
            let id = graph.create_boxed(
                stream.kind.input_count(),
                stream.kind.output_count(),
                stream.sample_rate,
                stream.kind.producer(stream.sample_rate),
            );
            if stream.output_gain != 1.0 {
                graph.set_output_gain(id, 0, stream.output_gain)?;
            }
            ids.push(id);
        }

        for (stream, &id) in self.streams.iter().zip(&ids) {
            for (index, input) in stream.inputs.iter().enumerate() {
                let source = graph.find(&input.source, 0).ok_or_else(|| {
                    ValidationError::UnknownSource {
                        stream: stream.tag.clone(),
                        source_tag: input.source.clone(),
                    }
                })?;
                graph.set_input(id, index, Some(source), input.output, input.gain)?;
            }
        }

        Ok(graph)
    }
}

/// Instantiates a palette and applies the configured adjustments and pens.
pub fn build_palette(config: &PaletteConfig) -> Result<Palette, ConfigError> {
    let mut palette = Palette::new(config.layout())?;

    if let Some(factor) = config.shadow_factor {
        palette.set_shadow_factor(factor);
    }
    if let Some(factor) = config.highlight_factor {
        palette.set_highlight_factor(factor);
    }
    if let Some(gamma) = config.gamma {
        palette.set_gamma(gamma);
    }
    if let Some(brightness) = config.brightness {
        palette.set_global_brightness(brightness);
    }

    let colors = config
        .pens
        .iter()
        .enumerate()
        .map(|(pen, value)| {
            parse_color(value).ok_or_else(|| ValidationError::InvalidColor {
                pen,
                value: value.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    palette.set_colors(0, &colors)?;

    Ok(palette)
}
