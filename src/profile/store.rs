// Profile directory
// Profiles live as `<name>.json` files under `~/.drunkdeer`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::import::WebDriverProfile;
use super::types::Profile;
use super::ProfileError;
use crate::fetch;

/// Directory name under the user's home
pub const PROFILE_DIR_NAME: &str = ".drunkdeer";

const EXTENSION: &str = "json";

/// A source is a URL when it starts with "http" and contains "://"
pub fn is_url(source: &str) -> bool {
    source.starts_with("http") && source.contains("://")
}

/// Append `.json` unless already present
pub fn ensure_json_extension(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    }
}

/// Profile file name for a base name, rejecting names with an empty stem
fn profile_file_name(base: &str, source: &str) -> Result<String, ProfileError> {
    let file_name = ensure_json_extension(base);
    if file_name.trim_end_matches(".json").is_empty() {
        return Err(ProfileError::EmptyName(source.to_string()));
    }
    Ok(file_name)
}

/// Where profile bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    Url(String),
    Path(PathBuf),
}

impl ProfileSource {
    pub fn parse(source: &str) -> Self {
        if is_url(source) {
            Self::Url(source.to_string())
        } else {
            Self::Path(PathBuf::from(source))
        }
    }

    /// Last path segment of the source
    pub fn base_name(&self) -> String {
        match self {
            Self::Url(url) => url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Read the raw bytes, downloading URLs
    pub fn read(&self) -> Result<Vec<u8>, ProfileError> {
        match self {
            Self::Url(url) => Ok(fetch::download_blocking(url)?),
            Self::Path(path) => fs::read(path).map_err(|e| ProfileError::io(path, e)),
        }
    }
}

/// The profile directory
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open `~/.drunkdeer`, creating it if needed
    pub fn open_default() -> Result<Self, ProfileError> {
        let home = dirs::home_dir().ok_or(ProfileError::NoHomeDir)?;
        Self::open(home.join(PROFILE_DIR_NAME))
    }

    /// Open a profile directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ProfileError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a profile name; absolute paths are used as-is
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.dir.join(ensure_json_extension(name))
    }

    /// Profile names (without extension), sorted
    pub fn list(&self) -> Result<Vec<String>, ProfileError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| ProfileError::io(&self.dir, e))?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Load a profile by name, absolute path or URL
    pub fn load(&self, source: &str) -> Result<Profile, ProfileError> {
        let source = match ProfileSource::parse(source) {
            ProfileSource::Path(_) => ProfileSource::Path(self.resolve(source)),
            url => url,
        };
        debug!("Loading profile from {:?}", source);
        Profile::from_slice(&source.read()?)
    }

    /// Copy a profile file (absolute path) or download (URL) into the store
    ///
    /// Refuses to overwrite an existing profile.
    pub fn save(&self, raw: &str) -> Result<PathBuf, ProfileError> {
        let source = ProfileSource::parse(raw);
        let file_name = match &source {
            ProfileSource::Path(path) if !path.is_absolute() => {
                return Err(ProfileError::NotAbsolute(path.clone()));
            }
            ProfileSource::Path(_) => profile_file_name(&source.base_name(), raw)?,
            ProfileSource::Url(_) => {
                let base = source.base_name();
                let stem = Path::new(&base)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or(base);
                profile_file_name(&stem, raw)?
            }
        };

        let target = self.dir.join(file_name);
        if target.exists() {
            return Err(ProfileError::AlreadyExists(target));
        }
        let bytes = source.read()?;
        fs::write(&target, bytes).map_err(|e| ProfileError::io(&target, e))?;
        Ok(target)
    }

    /// Import a web-driver export, writing the converted profile
    pub fn import(&self, raw: &str) -> Result<(String, PathBuf), ProfileError> {
        let source = ProfileSource::parse(raw);
        let file_name = profile_file_name(&source.base_name(), raw)?;
        let web = WebDriverProfile::from_slice(&source.read()?)?;
        let profile = web.to_profile();

        let target = self.dir.join(&file_name);
        self.write(&target, &profile)?;

        let name = file_name.trim_end_matches(".json").to_string();
        Ok((name, target))
    }

    fn write(&self, path: &Path, profile: &Profile) -> Result<(), ProfileError> {
        fs::write(path, profile.to_json()?).map_err(|e| ProfileError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/p.json"));
        assert!(is_url("http://x/y"));
        assert!(!is_url("httpfoo"));
        assert!(!is_url("/home/me/http://"));
        assert!(!is_url("profile"));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(
            ProfileSource::parse("https://example.com/a/b.json").base_name(),
            "b.json"
        );
        assert_eq!(ProfileSource::parse("/tmp/x/my.json").base_name(), "my.json");
    }

    #[test]
    fn test_profile_file_name() {
        assert_eq!(profile_file_name("mine", "/x/mine").unwrap(), "mine.json");
        assert!(matches!(profile_file_name("", "/"), Err(ProfileError::EmptyName(_))));
        assert!(matches!(
            profile_file_name(".json", "/x/.json"),
            Err(ProfileError::EmptyName(_))
        ));
    }

    #[test]
    fn test_ensure_json_extension() {
        assert_eq!(ensure_json_extension("a"), "a.json");
        assert_eq!(ensure_json_extension("a.json"), "a.json");
    }
}
