//! Commands that talk to a keyboard

use anyhow::{bail, Context};
use crossterm::style::Stylize;
use drunkdeer::ProfileStore;
use drunkdeer_keyboard::light::DEFAULT_COLOR;
use drunkdeer_keyboard::list_keyboards;
use tracing::{debug, warn};

use super::{open_keyboard, with_keyboard, CommandResult, IDENTITY_TIMEOUT};

/// Load a profile onto the keyboard
pub fn load(store: &ProfileStore, index: usize, source: &str) -> CommandResult {
    let profile = store
        .load(source)
        .with_context(|| format!("Failed to load profile {source}"))?;
    let keys = profile.key_state()?;

    with_keyboard(index, |kb| {
        let identity = kb
            .identity_timeout(IDENTITY_TIMEOUT)
            .context("Keyboard did not report its identity")?;
        if !profile.matches_model(identity.model_name()) {
            bail!(
                "Profile model does not match device model (expected {}, got {})",
                identity.model_name(),
                profile.model
            );
        }

        debug!(
            "Model: {} | Turbo: {} | RT: {} | Default actuation: {}",
            profile.model,
            profile.turbo,
            profile.rapid_trigger.enabled,
            profile.default_actuation
        );

        kb.send_rapid_trigger_turbo(profile.rapid_trigger.enabled, profile.turbo)?;
        kb.send_light_mode(profile.light_state(), DEFAULT_COLOR)?;
        kb.load_actuations(&keys.actuations)?;
        kb.load_downstrokes(&keys.downstrokes)?;
        kb.load_upstrokes(&keys.upstrokes)?;

        println!(
            "Loaded {} for {}",
            source.green(),
            format!("DrunkDeer {}", identity.model_name()).blue()
        );
        Ok(())
    })
}

/// Reset the keyboard to default settings
pub fn reset(index: usize) -> CommandResult {
    with_keyboard(index, |kb| {
        println!("{}", "Resetting device to default settings".red());
        kb.write_defaults()?;
        Ok(())
    })?;
    println!("Reset complete");
    Ok(())
}

/// List connected keyboards with model and firmware version
pub fn list() -> CommandResult {
    let devices = list_keyboards()?;
    if devices.is_empty() {
        println!("{}", "No devices found".red());
        return Ok(());
    }

    println!("{}", "Connected devices:".green());
    for i in 0..devices.len() {
        let keyboard = match open_keyboard(i) {
            Ok(kb) => kb,
            Err(e) => {
                println!("{}", format!("Error opening device {i}: {e:#}").red());
                continue;
            }
        };
        let identity = keyboard.identity_timeout(IDENTITY_TIMEOUT);
        if let Err(e) = keyboard.close() {
            warn!("Error closing device {}: {}", i, e);
        }

        match identity {
            Some(identity) => println!(
                "{}: {} {}",
                i.to_string().white(),
                format!("DrunkDeer {}", identity.model_name()).blue(),
                format!("(firmware version: v{})", identity.firmware_version).dark_grey()
            ),
            None => println!(
                "{}",
                format!("Error reading identity for device {i}").red()
            ),
        }
    }
    Ok(())
}
