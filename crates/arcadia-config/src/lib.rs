//! Machine descriptions for arcadia sound graphs and palettes.
//!
//! A machine file is a TOML document listing a machine's sound streams, how
//! they are wired, which one is the audio output, and optionally the layout
//! of its palette. This crate loads, validates, saves and instantiates them.
//!
//! # Features
//!
//! - **Machine files**: load and save [`MachineConfig`] as TOML
//! - **Validation**: report every wiring and palette mistake at once
//! - **Building**: turn a description into a running [`Machine`]
//! - **Paths**: per-user machine directory
//! - **Factory machines**: built-in machines for demos and tests
//!
//! # Example
//!
//! ```rust
//! use arcadia_config::get_factory_machine;
//!
//! let config = get_factory_machine("demo").unwrap();
//! let mut machine = config.build()?;
//! let frame = machine.render_frame()?;
//! assert_eq!(frame.len(), 800);
//! # Ok::<(), arcadia_config::ConfigError>(())
//! ```

mod build;
mod error;
mod machine;
mod palette_config;
mod stream_config;

/// Platform-specific paths for machine files.
pub mod paths;

/// Machine validation.
pub mod validation;

/// Factory machines bundled with the library.
pub mod factory;

pub use build::{Machine, build_palette};
pub use error::ConfigError;
pub use factory::{
    FACTORY_MACHINE_NAMES, factory_machines, get_factory_machine, is_factory_machine,
    resolve_machine,
};
pub use machine::MachineConfig;
pub use palette_config::{FormatName, PaletteConfig, parse_color};
pub use paths::{
    ensure_user_machines_dir, find_machine, list_user_machines, machine_name_from_path,
    user_machines_dir,
};
pub use stream_config::{InputConfig, ProducerKind, StreamConfig};
pub use validation::{ValidationError, ValidationResult, validate_machine};
