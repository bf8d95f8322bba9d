//! Config file loading

use crate::domain::Config;
use crate::error::ExtractError;
use std::fs;
use std::io;
use std::path::Path;

const PSET_FIELD: &str = "job_type.pset_name";

/// Load and validate the configuration at `path`.
pub fn resolve(path: &Path) -> Result<Config, ExtractError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ExtractError::NotFound { path: path.to_path_buf() });
        }
        Err(e) => {
            return Err(ExtractError::Syntax { path: path.to_path_buf(), message: e.to_string() });
        }
    };

    let mut config = parse_config(&content, path)?;
    config.source_path = path.to_path_buf();

    let pset_name = config.job_type().and_then(|jt| jt.pset_name.as_deref()).map(str::trim);
    match pset_name {
        Some(name) if !name.is_empty() => {
            tracing::debug!("Resolved {} = {} from {}", PSET_FIELD, name, path.display());
        }
        _ => {
            return Err(ExtractError::MissingField { path: path.to_path_buf(), field: PSET_FIELD });
        }
    }

    Ok(config)
}

fn parse_config(content: &str, path: &Path) -> Result<Config, ExtractError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let syntax = |message: String| ExtractError::Syntax { path: path.to_path_buf(), message };

    match ext.as_str() {
        "toml" => toml::from_str(content).map_err(|e| syntax(e.to_string())),
        "json" => serde_json::from_str(content).map_err(|e| syntax(e.to_string())),
        _ => {
            // An empty YAML document is valid but carries no fields.
            if content.trim().is_empty() {
                return Ok(Config::default());
            }
            serde_yaml::from_str(content).map_err(|e| syntax(e.to_string()))
        }
    }
}
