//! User configuration resolution
//!
//! Reads the job configuration (YAML, TOML or JSON, chosen by extension) and
//! validates that it references a parameter-set.

pub mod loader;

pub use loader::resolve;
