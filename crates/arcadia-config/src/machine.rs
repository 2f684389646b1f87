//! Machine file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use arcadia_sound::DEFAULT_REFRESH_RATE;

use crate::error::ConfigError;
use crate::palette_config::PaletteConfig;
use crate::stream_config::StreamConfig;

/// A machine's sound graph and palette, as stored in a TOML file.
///
/// # TOML Format
///
/// ```toml
/// name = "demo"
/// refresh_rate = 60.0
/// output = "speaker"
///
/// [[streams]]
/// tag = "psg"
/// sample_rate = 44100
/// kind = { type = "tone", frequency = 440.0, amplitude = 8000 }
///
/// [[streams]]
/// tag = "speaker"
/// sample_rate = 22050
/// kind = { type = "mixer", inputs = 1 }
/// [[streams.inputs]]
/// source = "psg"
/// gain = 0.5
///
/// [palette]
/// colors = 16
/// shadows = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineConfig {
    /// Name of the machine.
    pub name: String,

    /// Optional description of the machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Presentation refresh rate in Hz (defaults to 60).
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate: f64,

    /// Tag of the stream rendered as the machine's audio output; the last
    /// stream when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Streams in creation order.
    #[serde(default)]
    pub streams: Vec<StreamConfig>,

    /// Palette, if the machine has video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<PaletteConfig>,
}

fn default_refresh_rate() -> f64 {
    DEFAULT_REFRESH_RATE
}

impl MachineConfig {
    /// Create a new empty machine.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            refresh_rate: DEFAULT_REFRESH_RATE,
            output: None,
            streams: Vec::new(),
            palette: None,
        }
    }

    /// Create a machine with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the refresh rate.
    pub fn with_refresh_rate(mut self, refresh_rate: f64) -> Self {
        self.refresh_rate = refresh_rate;
        self
    }

    /// Add a stream.
    pub fn with_stream(mut self, stream: StreamConfig) -> Self {
        self.streams.push(stream);
        self
    }

    /// Set the output stream tag.
    pub fn with_output(mut self, tag: impl Into<String>) -> Self {
        self.output = Some(tag.into());
        self
    }

    /// Set the palette.
    pub fn with_palette(mut self, palette: PaletteConfig) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Load a machine from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let machine: MachineConfig = toml::from_str(&content)?;
        tracing::debug!("machine_load: '{}' from {}", machine.name, path.display());
        Ok(machine)
    }

    /// Load a machine from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the machine to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the machine to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Tag of the stream rendered as audio output.
    pub fn output_tag(&self) -> Option<&str> {
        self.output
            .as_deref()
            .or_else(|| self.streams.last().map(|s| s.tag.as_str()))
    }

    /// Look up a stream by tag.
    pub fn stream(&self, tag: &str) -> Option<&StreamConfig> {
        self.streams.iter().find(|s| s.tag == tag)
    }

    /// Get the number of streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Check if the machine has no streams.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
