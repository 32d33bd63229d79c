// CLI definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "drunkdeer")]
#[command(author, version, about = "DrunkDeer magnetic keyboard configuration tool")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (packet traffic)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Keyboard index to use (0 for first device, 1 for second, etc.)
    #[arg(short, long, global = true, default_value_t = 0)]
    pub index: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a profile onto the keyboard
    #[command(visible_alias = "l")]
    Load {
        /// Profile name in the profile directory, absolute path, or URL
        profile: String,
    },

    /// Save a profile file or URL into the profile directory
    #[command(visible_alias = "s")]
    Save {
        /// Absolute path or URL
        source: String,
    },

    /// Import a DrunkDeer web-driver profile from a file or URL
    #[command(visible_alias = "i")]
    Import {
        /// Path or URL of the web-driver export
        source: String,
    },

    /// Reset the keyboard to default settings
    Reset,

    /// List connected keyboards
    #[command(visible_alias = "ls")]
    List,

    /// Show available profiles
    #[command(visible_alias = "p")]
    Profiles,

    /// Show version information
    #[command(visible_alias = "v")]
    Version,
}
