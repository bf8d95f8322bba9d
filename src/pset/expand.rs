//! Parameter-set expansion: includes, deep merge and `${name}` references.

use crate::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const INCLUDE_KEY: &str = "include";
pub const VARS_KEY: &str = "vars";
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

static VAR_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid var regex"));

/// Load `path`, resolve its includes and variable references.
///
/// `overrides` are `name=value` strings layered over the document's `vars`.
pub fn expand_file(path: &Path, overrides: &[String]) -> Result<Value, ExtractError> {
    let mut stack = Vec::new();
    let mut document = load_with_includes(path, &mut stack)?;

    let mut vars = match document.remove(VARS_KEY) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(vars)) => vars,
        Some(_) => return Err(ExtractError::load(path, "'vars' must be a mapping")),
    };
    for param in overrides {
        let (name, value) = parse_override(param).map_err(|msg| ExtractError::load(path, msg))?;
        tracing::debug!("Overriding parameter-set variable {} = {}", name, value);
        vars.insert(name, value);
    }

    let mut expanded =
        interpolate_map(document, &vars).map_err(|msg| ExtractError::load(path, msg))?;
    if !vars.is_empty() {
        expanded.insert(VARS_KEY.to_string(), Value::Object(vars));
    }
    Ok(Value::Object(expanded))
}

fn load_with_includes(
    path: &Path,
    stack: &mut Vec<PathBuf>,
) -> Result<Map<String, Value>, ExtractError> {
    let canonical = fs::canonicalize(path).map_err(|e| ExtractError::load(path, e))?;
    if stack.contains(&canonical) {
        let chain: Vec<String> = stack
            .iter()
            .chain(std::iter::once(&canonical))
            .map(|p| p.display().to_string())
            .collect();
        return Err(ExtractError::load(path, format!("include cycle: {}", chain.join(" -> "))));
    }

    let mut own = match load_document(&canonical)? {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        _ => return Err(ExtractError::load(path, "top level must be a mapping")),
    };

    let includes = match own.remove(INCLUDE_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(single)) => vec![single],
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(ExtractError::load(
                    path,
                    format!("include entries must be strings, found {other}"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ExtractError::load(path, format!("invalid include value {other}")));
        }
    };

    let base = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
    stack.push(canonical);
    let mut merged = Map::new();
    for include in includes {
        tracing::debug!("Including {} from {}", include, path.display());
        let included = load_with_includes(&base.join(&include), stack)?;
        deep_merge(&mut merged, included);
    }
    stack.pop();

    deep_merge(&mut merged, own);
    Ok(merged)
}

/// Parse one parameter-set file, format chosen by extension (YAML default).
fn load_document(path: &Path) -> Result<Value, ExtractError> {
    let content = fs::read_to_string(path).map_err(|e| ExtractError::load(path, e))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match ext.as_str() {
        "json" => serde_json::from_str(&content).map_err(|e| ExtractError::load(path, e)),
        "toml" => toml::from_str(&content)
            .map(normalize_toml_datetimes)
            .map_err(|e| ExtractError::load(path, e)),
        _ => {
            if content.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_yaml::from_str(&content).map_err(|e| ExtractError::load(path, e))
        }
    }
}

/// TOML datetimes deserialize as `{"$__toml_private_datetime": "..."}`; keep the text.
fn normalize_toml_datetimes(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(text)) = map.get(TOML_DATETIME_KEY) {
                    return Value::String(text.clone());
                }
            }
            Value::Object(map.into_iter().map(|(k, v)| (k, normalize_toml_datetimes(v))).collect())
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(normalize_toml_datetimes).collect())
        }
        other => other,
    }
}

/// Merge `overlay` into `target`. Mappings merge key-wise, anything else replaces.
pub fn deep_merge(target: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = target.get_mut(&key) {
                deep_merge(existing, incoming);
                continue;
            }
            target.insert(key, Value::Object(incoming));
        } else {
            target.insert(key, value);
        }
    }
}

fn parse_override(param: &str) -> Result<(String, Value), String> {
    let Some((name, raw)) = param.split_once('=') else {
        return Err(format!("parameter override '{param}' is not of the form name=value"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("parameter override '{param}' has an empty name"));
    }
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok((name.to_string(), Value::String(String::new())));
    }
    let value = serde_yaml::from_str::<Value>(raw)
        .map_err(|e| format!("parameter override '{param}' is not a valid YAML scalar: {e}"))?;
    if value.is_array() || value.is_object() {
        return Err(format!("parameter override '{param}' must be a scalar value"));
    }
    Ok((name.to_string(), value))
}

fn interpolate(value: Value, vars: &Map<String, Value>) -> Result<Value, String> {
    match value {
        Value::String(text) => interpolate_str(text, vars),
        Value::Array(items) => items
            .into_iter()
            .map(|item| interpolate(item, vars))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => interpolate_map(map, vars).map(Value::Object),
        other => Ok(other),
    }
}

fn interpolate_map(
    map: Map<String, Value>,
    vars: &Map<String, Value>,
) -> Result<Map<String, Value>, String> {
    let mut out = Map::new();
    for (key, item) in map {
        out.insert(key, interpolate(item, vars)?);
    }
    Ok(out)
}

fn interpolate_str(text: String, vars: &Map<String, Value>) -> Result<Value, String> {
    let mut whole = None;
    for caps in VAR_REF_RE.captures_iter(&text) {
        let name = &caps[1];
        let Some(value) = vars.get(name) else {
            return Err(format!("undefined variable '{name}' referenced in \"{text}\""));
        };
        if caps[0].len() == text.len() {
            whole = Some(value.clone());
        }
    }
    if let Some(value) = whole {
        return Ok(value);
    }
    if !VAR_REF_RE.is_match(&text) {
        return Ok(Value::String(text));
    }

    let replaced = VAR_REF_RE.replace_all(&text, |caps: &regex::Captures<'_>| {
        match vars.get(&caps[1]) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    });
    Ok(Value::String(replaced.into_owned()))
}
