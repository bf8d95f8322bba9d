//! Parameter-set artifact extraction
//!
//! Expands the parameter-set referenced by the configuration into its canonical
//! JSON form and derives the [`ArtifactInfo`] record from it.

use anyhow::Result;
use std::path::Path;

use crate::domain::{ArtifactInfo, Config};
use crate::error::ExtractError;
use crate::render::{render_json, write_bytes, write_json};
use crate::utils::content_digest;

pub mod classify;
pub mod expand;

pub use classify::classify;
pub use expand::expand_file;

/// Expand the configured parameter-set and classify its outputs.
///
/// Returns the canonical serialized form and the classification record.
pub fn extract(config: &Config) -> Result<(Vec<u8>, ArtifactInfo)> {
    let Some(pset_path) = config.pset_path() else {
        return Err(ExtractError::MissingField {
            path: config.source_path.clone(),
            field: "job_type.pset_name",
        }
        .into());
    };

    tracing::info!(
        "Expanding parameter-set {} for plugin {}",
        pset_path.display(),
        config.plugin_name()
    );
    let document = expand_file(&pset_path, config.pset_params())?;
    let bytes = render_json(&document)?.into_bytes();
    tracing::info!("Expanded parameter-set digest {}", content_digest(&bytes));

    let info = classify(&document)?;
    tracing::debug!(
        "Classified outputs: {} dataset, {} generic, lhe={:?}",
        info.dataset_outputs().len(),
        info.generic_outputs().len(),
        info.lheinfo
    );

    Ok((bytes, info))
}

/// Persist the expanded parameter-set and its artifact info.
pub fn write_artifacts(
    expanded: &[u8],
    info: &ArtifactInfo,
    expanded_dest: &Path,
    info_dest: &Path,
) -> Result<(), ExtractError> {
    write_bytes(expanded_dest, expanded)?;
    write_json(info_dest, info)?;
    Ok(())
}
