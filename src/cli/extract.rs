//! Extract command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::RunGuard;
use crate::config::resolve;
use crate::env::{snapshot, write_snapshot, ProcessEnv};
use crate::pset::{extract, write_artifacts};
use crate::workspace::TempWorkspace;

pub const DEFAULT_CONFIG_FILE: &str = "crab_config.yaml";

#[derive(Args)]
pub struct ExtractArgs {
    /// Job configuration file (YAML, TOML or JSON) referencing the parameter-set
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory in which to create the output workspace (defaults to the system temp dir)
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, guard: &mut RunGuard) -> Result<()> {
    let config = resolve(&args.config)?;
    tracing::info!(
        "Loaded configuration {} (request: {})",
        args.config.display(),
        config.general.request_name.as_deref().unwrap_or("<unnamed>")
    );

    let workspace = TempWorkspace::create(args.output_root.as_deref())?;
    guard.set_workspace(workspace.path().to_path_buf());

    let env = snapshot(&ProcessEnv);
    tracing::info!(
        "Captured environment for {} on {}",
        env.get("CMSSW_VERSION").filter(|v| !v.is_empty()).unwrap_or("<unknown release>"),
        env.get("SCRAM_ARCH").filter(|v| !v.is_empty()).unwrap_or("<unknown arch>")
    );
    write_snapshot(&env, &workspace.env_file())?;

    let (expanded, info) = extract(&config).with_context(|| {
        format!("Failed extracting artifacts from {}", args.config.display())
    })?;
    write_artifacts(
        &expanded,
        &info,
        &workspace.expanded_pset_file(),
        &workspace.pset_info_file(),
    )?;

    tracing::info!("Saved environment and parameter-set to {}", workspace.path().display());
    Ok(())
}
