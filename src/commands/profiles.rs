//! Profile directory commands

use anyhow::Context;
use crossterm::style::Stylize;
use drunkdeer::ProfileStore;

use super::CommandResult;

/// Save an absolute-path profile or URL into the profile directory
pub fn save(store: &ProfileStore, source: &str) -> CommandResult {
    let target = store
        .save(source)
        .with_context(|| format!("Error saving profile {source}"))?;
    println!("{}", format!("Profile saved to {}", target.display()).green());
    Ok(())
}

/// Import a web-driver export
pub fn import(store: &ProfileStore, source: &str) -> CommandResult {
    let (name, target) = store
        .import(source)
        .with_context(|| format!("Error importing profile {source}"))?;
    println!(
        "{}",
        format!("Profile imported to {}", target.display()).green()
    );
    println!("Use: {}", format!("drunkdeer load {name}").blue());
    Ok(())
}

/// Show available profiles
pub fn profiles(store: &ProfileStore) -> CommandResult {
    let names = store.list()?;
    if names.is_empty() {
        println!("{}", "No profiles found".red());
        return Ok(());
    }
    println!("{}", "Available profiles:".green());
    for name in names {
        println!("{name}");
    }
    Ok(())
}
