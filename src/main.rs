//! DrunkDeer Keyboard Configuration CLI
//!
//! Loads profiles onto DrunkDeer magnetic keyboards and manages the profile
//! directory.

use anyhow::Context;
use clap::Parser;
use drunkdeer::ProfileStore;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

fn init_logging(debug: bool) {
    let default = if debug {
        "drunkdeer=debug,drunkdeer_keyboard=debug,drunkdeer_transport=debug"
    } else {
        "drunkdeer=info,drunkdeer_keyboard=warn,drunkdeer_transport=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn profile_store() -> anyhow::Result<ProfileStore> {
    ProfileStore::open_default().context("Error creating profile directory")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    tracing::debug!("Debug logging enabled");

    match cli.command {
        None => commands::utility::command_list()?,

        // === Device Commands ===
        Some(Commands::Load { profile }) => {
            commands::device::load(&profile_store()?, cli.index, &profile)?;
        }
        Some(Commands::Reset) => {
            commands::device::reset(cli.index)?;
        }
        Some(Commands::List) => {
            commands::device::list()?;
        }

        // === Profile Commands ===
        Some(Commands::Save { source }) => {
            commands::profiles::save(&profile_store()?, &source)?;
        }
        Some(Commands::Import { source }) => {
            commands::profiles::import(&profile_store()?, &source)?;
        }
        Some(Commands::Profiles) => {
            commands::profiles::profiles(&profile_store()?)?;
        }

        // === Utility ===
        Some(Commands::Version) => {
            commands::utility::version()?;
        }
    }

    Ok(())
}
