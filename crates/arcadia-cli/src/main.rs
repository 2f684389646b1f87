//! Arcadia CLI - render machine audio and inspect sound graphs and palettes.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcadia")]
#[command(author, version, about = "Arcadia machine sound and palette tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a machine's audio output to a WAV file
    Render(commands::render::RenderArgs),

    /// Show a machine's stream graph
    Graph(commands::graph::GraphArgs),

    /// Show a machine's palette
    Palette(commands::palette::PaletteArgs),

    /// List, show and copy machine files
    Machines(commands::machines::MachinesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Graph(args) => commands::graph::run(args),
        Commands::Palette(args) => commands::palette::run(args),
        Commands::Machines(args) => commands::machines::run(args),
    }
}
