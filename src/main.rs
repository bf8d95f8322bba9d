//! cmssw-extract: capture CMSSW environment and job configuration
//!
//! Reads a job configuration, expands the parameter-set it references and saves
//! the environment snapshot, the expanded parameter-set and output metadata into
//! a fresh temporary directory whose path is printed on stdout.

use std::process::ExitCode;

mod cli;
mod config;
mod domain;
mod env;
mod error;
mod pset;
mod render;
mod utils;
mod workspace;

fn main() -> ExitCode {
    cli::run()
}
