//! Environment snapshotting
//!
//! Captures [`CAPTURED_ENV_VARS`] from an [`EnvSource`]. Capture is
//! best-effort: unset variables are recorded as empty strings and non-UTF-8
//! values are kept with invalid sequences replaced.

use crate::domain::{EnvironmentSnapshot, CAPTURED_ENV_VARS};
use crate::render::write_json;
use crate::error::ExtractError;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Read-only key-value view of an environment.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

pub fn snapshot(source: &dyn EnvSource) -> EnvironmentSnapshot {
    let vars: BTreeMap<String, String> = CAPTURED_ENV_VARS
        .iter()
        .map(|name| ((*name).to_string(), source.var(name).unwrap_or_default()))
        .collect();

    let snapshot = EnvironmentSnapshot::new(vars);
    let missing: Vec<&str> = snapshot.missing().collect();
    if !missing.is_empty() {
        tracing::warn!("Environment variables not set: {}", missing.join(", "));
    }
    snapshot
}

pub fn write_snapshot(snapshot: &EnvironmentSnapshot, dest: &Path) -> Result<(), ExtractError> {
    write_json(dest, snapshot)?;
    tracing::info!("Wrote {} environment variables to {}", snapshot.len(), dest.display());
    Ok(())
}
