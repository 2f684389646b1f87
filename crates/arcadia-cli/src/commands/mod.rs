//! CLI command implementations.

pub mod graph;
pub mod machines;
pub mod palette;
pub mod render;

use arcadia_config::{Machine, MachineConfig, resolve_machine};

/// Loads a machine by path or name and builds it.
fn load_machine(name: &str) -> anyhow::Result<(MachineConfig, Machine)> {
    let config = resolve_machine(name)?;
    let machine = config.build()?;
    Ok((config, machine))
}
