// Profile schema
// Distances are in millimetres; they are converted to firmware units on load

use std::collections::BTreeMap;

use drunkdeer_keyboard::layout::key_index;
use drunkdeer_keyboard::{mm_to_byte, LightSequence, LightState, PerKeyState};
use serde::{Deserialize, Serialize};

use super::ProfileError;

/// Rapid trigger switch and default sensitivities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RapidTriggerSettings {
    pub enabled: bool,
    pub default_downstroke: f32,
    pub default_upstroke: f32,
}

/// LED mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub enabled: bool,
    pub direction: u8,
    pub sequence: u8,
    pub speed: u8,
    pub brightness: u8,
}

/// A keyboard profile as stored in the profile directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Model the profile was made for; empty matches any keyboard
    pub model: String,
    pub rapid_trigger: RapidTriggerSettings,
    pub turbo: bool,
    pub default_actuation: f32,
    /// Per-key actuation overrides by key name
    pub actuation_points: BTreeMap<String, f32>,
    /// Per-key `[downstroke, upstroke]` overrides by key name
    pub rapid_triggers: BTreeMap<String, [f32; 2]>,
    pub light: LightSettings,
}

impl Profile {
    /// Load profile from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProfileError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether the profile may be loaded onto a keyboard of `model`
    pub fn matches_model(&self, model: &str) -> bool {
        self.model.is_empty() || self.model == model
    }

    /// Expand defaults and overrides into per-key firmware values
    pub fn key_state(&self) -> Result<PerKeyState, ProfileError> {
        let mut keys = PerKeyState::default();
        keys.actuations.fill(mm_to_byte(self.default_actuation));
        keys.downstrokes
            .fill(mm_to_byte(self.rapid_trigger.default_downstroke));
        keys.upstrokes
            .fill(mm_to_byte(self.rapid_trigger.default_upstroke));

        for (name, &mm) in &self.actuation_points {
            let i = lookup(name)?;
            keys.actuations[i] = mm_to_byte(mm);
        }
        for (name, &[down, up]) in &self.rapid_triggers {
            let i = lookup(name)?;
            keys.downstrokes[i] = mm_to_byte(down);
            keys.upstrokes[i] = mm_to_byte(up);
        }
        Ok(keys)
    }

    /// LED mode to send; a disabled light turns the LEDs off
    pub fn light_state(&self) -> LightState {
        let sequence = if self.light.enabled {
            self.light.sequence
        } else {
            LightSequence::Off.as_u8()
        };
        LightState::new(
            self.light.direction,
            sequence,
            self.light.speed,
            self.light.brightness,
        )
    }
}

fn lookup(name: &str) -> Result<usize, ProfileError> {
    key_index(name).ok_or_else(|| ProfileError::UnknownKey(name.to_string()))
}
