// DrunkDeer keyboard configuration tool - shared library
// Profiles, web-driver import and remote profile download

pub mod fetch;
pub mod profile;

pub use profile::{Profile, ProfileError, ProfileStore};
