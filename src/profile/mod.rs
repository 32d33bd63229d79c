// Keyboard profile module
// User-editable JSON profiles, the web-driver import format and the profile directory

pub mod import;
pub mod store;
pub mod types;

pub use import::{WebDriverKey, WebDriverProfile};
pub use store::{is_url, ProfileSource, ProfileStore};
pub use types::{LightSettings, Profile, RapidTriggerSettings};

use std::path::PathBuf;

use thiserror::Error;

/// Profile loading and storage errors
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown key name in profile: {0}")]
    UnknownKey(String),

    #[error("{0} is not an absolute path")]
    NotAbsolute(PathBuf),

    #[error("{0} already exists")]
    AlreadyExists(PathBuf),

    #[error("Cannot derive a profile name from {0}")]
    EmptyName(String),

    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Download failed: {0}")]
    Fetch(#[from] crate::fetch::FetchError),
}

impl ProfileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
