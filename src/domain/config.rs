//! User job configuration

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_PLUGIN_NAME: &str = "Analysis";

/// Parsed user configuration.
///
/// Every field is optional at the serde level so that a missing required field
/// can be reported by name instead of as a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralSection,
    pub job_type: Option<JobTypeSection>,

    /// Path of the file this configuration was read from.
    #[serde(skip)]
    pub source_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneralSection {
    pub request_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobTypeSection {
    pub plugin_name: Option<String>,
    pub pset_name: Option<String>,
    /// `name=value` overrides applied to the parameter-set `vars`.
    pub pset_params: Vec<String>,
}

impl Config {
    pub fn job_type(&self) -> Option<&JobTypeSection> {
        self.job_type.as_ref()
    }

    pub fn plugin_name(&self) -> &str {
        self.job_type()
            .and_then(|jt| jt.plugin_name.as_deref())
            .unwrap_or(DEFAULT_PLUGIN_NAME)
    }

    /// Parameter-set path, resolved against the configuration file's directory.
    ///
    /// Only meaningful after [`crate::config::resolve`] validated the field.
    pub fn pset_path(&self) -> Option<PathBuf> {
        let name = self.job_type()?.pset_name.as_deref()?.trim();
        let candidate = PathBuf::from(name);
        if candidate.is_absolute() {
            return Some(candidate);
        }
        let base = self.source_path.parent().map(PathBuf::from).unwrap_or_default();
        Some(base.join(candidate))
    }

    pub fn pset_params(&self) -> &[String] {
        self.job_type().map(|jt| jt.pset_params.as_slice()).unwrap_or(&[])
    }
}
