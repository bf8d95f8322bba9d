//! Temporary output directory handed over to the caller.

use crate::domain::{ENV_FILE_NAME, EXPANDED_PSET_FILE_NAME, PSET_INFO_FILE_NAME};
use crate::error::ExtractError;
use std::path::{Path, PathBuf};

pub const WORKSPACE_PREFIX: &str = "cmssw-extract-";

/// A freshly created, uniquely named directory.
///
/// The directory is never removed here; whoever receives [`TempWorkspace::path`]
/// owns it.
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
}

impl TempWorkspace {
    /// Create a new workspace under `root`, or the system temp dir when `None`.
    pub fn create(root: Option<&Path>) -> Result<Self, ExtractError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        let dir = dir.map_err(|e| {
            ExtractError::write(root.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir), e)
        })?;

        let path = dir.keep();
        tracing::debug!("Created workspace {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn env_file(&self) -> PathBuf {
        self.path.join(ENV_FILE_NAME)
    }

    pub fn expanded_pset_file(&self) -> PathBuf {
        self.path.join(EXPANDED_PSET_FILE_NAME)
    }

    pub fn pset_info_file(&self) -> PathBuf {
        self.path.join(PSET_INFO_FILE_NAME)
    }
}
