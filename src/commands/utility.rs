//! Utility commands

use crossterm::style::Stylize;

use super::CommandResult;

/// Print the package version
pub fn version() -> CommandResult {
    println!("Version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Print the command list (no subcommand given)
pub fn command_list() -> CommandResult {
    println!("{}", "List of commands".blue());
    println!("For descriptions, run: drunkdeer --help");
    for cmd in [
        "import <url/path>",
        "load <profile>",
        "save <profile>",
        "profiles",
        "reset",
        "list",
        "version",
    ] {
        println!("  - drunkdeer {}", cmd.bold());
    }
    Ok(())
}
