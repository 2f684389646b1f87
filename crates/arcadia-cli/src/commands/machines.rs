//! Machine file management commands.
//!
//! Lists factory and user machines, prints a machine as TOML, checks a
//! machine file and copies factory machines into the user directory.

use anyhow::Context;
use arcadia_config::{
    MachineConfig, ensure_user_machines_dir, factory_machines, get_factory_machine,
    list_user_machines, machine_name_from_path, resolve_machine, user_machines_dir,
    validate_machine,
};
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct MachinesArgs {
    #[command(subcommand)]
    command: MachinesCommand,
}

#[derive(Subcommand)]
enum MachinesCommand {
    /// List available machines (factory and user)
    List {
        /// Show only factory machines
        #[arg(long)]
        factory: bool,

        /// Show only user machines
        #[arg(long)]
        user: bool,
    },

    /// Print a machine as TOML
    Show {
        /// Machine name or path
        name: String,
    },

    /// Validate a machine and report every problem
    Check {
        /// Machine name or path
        name: String,
    },

    /// Copy a factory machine to the user directory for customization
    Copy {
        /// Factory machine name
        source: String,

        /// New machine name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the user machine directory
    Paths,
}

pub fn run(args: MachinesArgs) -> anyhow::Result<()> {
    match args.command {
        MachinesCommand::List { factory, user } => list_machines(factory, user),
        MachinesCommand::Show { name } => show_machine(&name),
        MachinesCommand::Check { name } => check_machine(&name),
        MachinesCommand::Copy {
            source,
            name,
            force,
        } => copy_machine(&source, name.as_deref(), force),
        MachinesCommand::Paths => {
            println!("User machines: {}", user_machines_dir().display());
            Ok(())
        }
    }
}

fn list_machines(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Machines:");
        println!("=================");
        for machine in factory_machines() {
            print_summary(&machine);
        }
        println!();
    }

    if !factory_only {
        println!("User Machines:");
        println!("==============");
        let user = list_user_machines();
        if user.is_empty() {
            println!("  (none)");
            println!();
            println!("  Start from a factory machine with: arcadia machines copy <name>\n");
        }
        for path in user {
            match MachineConfig::load(&path) {
                Ok(machine) => print_summary(&machine),
                Err(e) => {
                    let name = machine_name_from_path(&path).unwrap_or_default();
                    println!("  {name:20} - (unreadable: {e})");
                }
            }
        }
    }
    Ok(())
}

fn print_summary(machine: &MachineConfig) {
    let desc = machine.description.as_deref().unwrap_or("");
    println!(
        "  {:20} - {} stream(s){}  {desc}",
        machine.name,
        machine.len(),
        if machine.palette.is_some() { ", palette" } else { "" }
    );
}

fn show_machine(name: &str) -> anyhow::Result<()> {
    let machine = resolve_machine(name)?;
    print!("{}", machine.to_toml()?);
    Ok(())
}

fn check_machine(name: &str) -> anyhow::Result<()> {
    let machine = resolve_machine(name)?;
    match validate_machine(&machine) {
        Ok(()) => {
            println!("{}: ok", machine.name);
            Ok(())
        }
        Err(e) => anyhow::bail!("{}: {e}", machine.name),
    }
}

fn copy_machine(source: &str, name: Option<&str>, force: bool) -> anyhow::Result<()> {
    let mut machine = get_factory_machine(source)
        .with_context(|| format!("'{source}' is not a factory machine"))?;
    let file_name = name.unwrap_or(source).to_lowercase().replace(' ', "_");
    if let Some(name) = name {
        machine.name = name.to_string();
    }

    let dir = ensure_user_machines_dir()?;
    let path = dir.join(format!("{file_name}.toml"));
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    machine.save(&path)?;
    println!("Copied '{source}' to {}", path.display());
    Ok(())
}
