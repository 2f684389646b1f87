//! Factory machines bundled with the library.
//!
//! These are always available without external files and double as worked
//! examples of the machine file format.

use crate::MachineConfig;
use crate::error::ConfigError;

/// Factory machine names.
pub static FACTORY_MACHINE_NAMES: &[&str] = &["demo", "arcade", "silent"];

static FACTORY_MACHINES_TOML: &[(&str, &str)] = &[
    ("demo", DEMO_MACHINE),
    ("arcade", ARCADE_MACHINE),
    ("silent", SILENT_MACHINE),
];

/// One tone through a mixer, no video.
const DEMO_MACHINE: &str = r##"
name = "Demo"
description = "A 440 Hz square wave resampled from 44.1 kHz to 48 kHz"
refresh_rate = 60.0

[[streams]]
tag = "psg"
sample_rate = 44100
kind = { type = "tone", frequency = 440.0, amplitude = 8000 }

[[streams]]
tag = "speaker"
sample_rate = 48000
kind = { type = "mixer", inputs = 1 }
[[streams.inputs]]
source = "psg"
"##;

/// Three chips at odd native rates mixed down, with a 256-color palette
/// that has shadow and highlight pens.
const ARCADE_MACHINE: &str = r##"
name = "Arcade"
description = "Two tone channels and a noise channel at native chip rates, mixed to 48 kHz"
refresh_rate = 59.185606
output = "speaker"

[[streams]]
tag = "psg1"
sample_rate = 223721
kind = { type = "tone", frequency = 261.63, amplitude = 6000 }

[[streams]]
tag = "psg2"
sample_rate = 111860
kind = { type = "tone", frequency = 329.63, amplitude = 6000 }
output_gain = 0.75

[[streams]]
tag = "noise"
sample_rate = 31250
kind = { type = "noise", frequency = 4000.0, amplitude = 3000 }

[[streams]]
tag = "speaker"
sample_rate = 48000
kind = { type = "mixer", inputs = 3 }
[[streams.inputs]]
source = "psg1"
gain = 0.5
[[streams.inputs]]
source = "psg2"
gain = 0.5
[[streams.inputs]]
source = "noise"
gain = 0.25

[palette]
colors = 256
format = "indexed"
shadows = true
highlights = true
pens = ["#000000", "#ffffff", "#ff0000", "#00ff00", "#0000ff"]
"##;

/// Silence and a direct-color palette.
const SILENT_MACHINE: &str = r##"
name = "Silent"
description = "A silent stream and a 32-bit direct color palette"
refresh_rate = 60.0

[[streams]]
tag = "speaker"
sample_rate = 48000
kind = { type = "silence" }

[palette]
colors = 64
format = "rgb32"
shadows = true
"##;

/// Returns every factory machine.
pub fn factory_machines() -> Vec<MachineConfig> {
    FACTORY_MACHINES_TOML
        .iter()
        .filter_map(|(_, toml)| MachineConfig::from_toml(toml).ok())
        .collect()
}

/// Gets a factory machine by identifier or display name, case-insensitive.
pub fn get_factory_machine(name: &str) -> Option<MachineConfig> {
    let name_lower = name.to_lowercase();

    for (id, toml) in FACTORY_MACHINES_TOML {
        if id.to_lowercase() == name_lower {
            return MachineConfig::from_toml(toml).ok();
        }
    }

    factory_machines()
        .into_iter()
        .find(|m| m.name.to_lowercase() == name_lower)
}

/// Check if `name` is a factory machine.
pub fn is_factory_machine(name: &str) -> bool {
    get_factory_machine(name).is_some()
}

/// Resolves a machine from a file path, a user machine name, or a factory
/// machine name, in that order.
pub fn resolve_machine(name: &str) -> Result<MachineConfig, ConfigError> {
    if let Some(path) = crate::paths::find_machine(name) {
        return MachineConfig::load(path);
    }
    get_factory_machine(name).ok_or_else(|| ConfigError::MachineNotFound(name.to_string()))
}
