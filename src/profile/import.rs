// DrunkDeer web-driver profile import
// Converts an exported web-driver profile into the CLI profile schema

use serde::{Deserialize, Serialize};

use super::types::{LightSettings, Profile, RapidTriggerSettings};
use super::ProfileError;

/// One key of a web-driver export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverKey {
    pub keyname: String,
    #[serde(rename = "action_point")]
    pub actuation: f32,
    pub downstroke: f32,
    pub upstroke: f32,
}

/// A web-driver export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverProfile {
    #[serde(rename = "storagename")]
    pub storage_name: String,
    #[serde(rename = "showname")]
    pub show_name: String,
    #[serde(rename = "keys_array")]
    pub keys: Vec<WebDriverKey>,
}

/// Most frequent value; ties go to the smallest value
fn most_used(values: impl Iterator<Item = f32>) -> f32 {
    let mut counts: Vec<(f32, usize)> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v, 1)),
        }
    }
    counts
        .into_iter()
        .max_by(|(a, na), (b, nb)| na.cmp(nb).then(b.total_cmp(a)))
        .map(|(v, _)| v)
        .unwrap_or(0.0)
}

impl WebDriverProfile {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProfileError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Model name embedded in the storage name ("xxxxxA75..." -> "A75")
    pub fn model(&self) -> &str {
        self.storage_name.get(5..8).unwrap_or("")
    }

    pub fn default_actuation(&self) -> f32 {
        most_used(self.keys.iter().map(|k| k.actuation))
    }

    pub fn default_downstroke(&self) -> f32 {
        most_used(self.keys.iter().map(|k| k.downstroke))
    }

    pub fn default_upstroke(&self) -> f32 {
        most_used(self.keys.iter().map(|k| k.upstroke))
    }

    /// Convert to a CLI profile
    ///
    /// Keys matching the most used values become defaults; the rest become
    /// per-key overrides. Zero values are treated as unset.
    pub fn to_profile(&self) -> Profile {
        let default_actuation = self.default_actuation();
        let default_downstroke = self.default_downstroke();
        let default_upstroke = self.default_upstroke();

        let mut profile = Profile {
            model: self.model().to_string(),
            rapid_trigger: RapidTriggerSettings {
                enabled: true,
                default_downstroke,
                default_upstroke,
            },
            turbo: false,
            default_actuation,
            light: LightSettings::default(),
            ..Default::default()
        };

        for key in &self.keys {
            if key.actuation != 0.0 && key.actuation != default_actuation {
                profile
                    .actuation_points
                    .insert(key.keyname.clone(), key.actuation);
            }

            let down_differs = key.downstroke != 0.0 && key.downstroke != default_downstroke;
            let up_differs = key.upstroke != 0.0 && key.upstroke != default_upstroke;
            if down_differs || up_differs {
                profile
                    .rapid_triggers
                    .insert(key.keyname.clone(), [key.downstroke, key.upstroke]);
            }
        }

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_used() {
        assert_eq!(most_used([1.0, 2.0, 2.0].into_iter()), 2.0);
        // Tie: smallest wins
        assert_eq!(most_used([3.0, 1.5].into_iter()), 1.5);
        assert_eq!(most_used(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_model_from_storage_name() {
        let mut profile = WebDriverProfile {
            storage_name: "prof_G65_1".into(),
            ..Default::default()
        };
        assert_eq!(profile.model(), "G65");
        profile.storage_name = "short".into();
        assert_eq!(profile.model(), "");
    }
}
