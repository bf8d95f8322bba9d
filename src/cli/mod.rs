//! Command-line interface for cmssw-extract
//!
//! Global options are parsed first, then the `extract` subcommand resolves the
//! job configuration and writes its artifacts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{recognized, ExtractError};

mod extract;

/// Exit code for an expected, recognized failure.
pub const EXIT_RECOGNIZED: u8 = 1;
/// Exit code for anything unexpected.
pub const EXIT_UNEXPECTED: u8 = 2;

/// Capture CMSSW environment and job configuration for submission outside the build area
#[derive(Parser)]
#[command(name = "cmssw-extract")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write log output to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the environment, expanded parameter-set and output info to a new temp directory
    Extract(extract::ExtractArgs),
}

/// Prints the workspace path (once one exists) and flushes output when dropped.
#[derive(Default)]
pub struct RunGuard {
    workspace: Option<PathBuf>,
}

impl RunGuard {
    pub fn set_workspace(&mut self, path: PathBuf) {
        self.workspace = Some(path);
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let mut stdout = std::io::stdout();
        if let Some(path) = &self.workspace {
            let _ = writeln!(stdout, "{}", path.display());
        }
        let _ = stdout.flush();
        let _ = std::io::stderr().flush();
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let mut guard = RunGuard::default();

    let result = init_logging(cli.verbose, cli.log_file.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|()| match cli.command {
            Commands::Extract(args) => extract::run(args, &mut guard),
        });

    exit_code(result)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), ExtractError> {
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| ExtractError::write(path, e))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .try_init();
    Ok(())
}

fn exit_code(result: Result<()>) -> ExitCode {
    let Err(err) = result else {
        return ExitCode::SUCCESS;
    };

    match recognized(&err) {
        Some(known) => {
            tracing::debug!("{:?}", err);
            eprintln!("Error: {known}");
            ExitCode::from(EXIT_RECOGNIZED)
        }
        None => {
            tracing::error!("Unexpected failure: {}", err);
            eprintln!("Unexpected error: {err:?}");
            ExitCode::from(EXIT_UNEXPECTED)
        }
    }
}
