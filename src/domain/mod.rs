//! Core data types: user configuration, environment snapshot and artifact info

mod artifact;
mod config;
mod env;

pub use artifact::ArtifactInfo;
pub use config::Config;
#[cfg(test)]
pub use config::JobTypeSection;
pub use env::{EnvironmentSnapshot, CAPTURED_ENV_VARS};

/// File names inside the temporary workspace.
pub const ENV_FILE_NAME: &str = "cmssw-env.json";
pub const EXPANDED_PSET_FILE_NAME: &str = "pset-expanded.json";
pub const PSET_INFO_FILE_NAME: &str = "pset-info.json";
