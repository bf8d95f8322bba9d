//! Captured build/runtime environment

use serde::Serialize;
use std::collections::BTreeMap;

/// Variables describing the CMSSW build area and runtime, captured verbatim.
pub const CAPTURED_ENV_VARS: &[&str] = &[
    "SCRAM_ARCH",
    "CMSSW_BASE",
    "CMSSW_RELEASE_BASE",
    "CMSSW_VERSION",
    "CMSSW_GIT_HASH",
    "LOCALRT",
    "CMS_PATH",
];

/// Immutable name → value mapping. Unset variables hold an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvironmentSnapshot {
    pub(crate) fn new(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Names whose value was empty at capture time.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().filter(|(_, v)| v.is_empty()).map(|(k, _)| k.as_str())
    }
}
