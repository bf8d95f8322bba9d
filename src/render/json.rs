//! Pretty JSON output files.

use crate::error::ExtractError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serialize `value` as pretty JSON with a trailing newline.
///
/// Keys of `serde_json::Value` maps come out sorted, so the same value always
/// renders to the same bytes.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExtractError> {
    let mut text = serde_json::to_string_pretty(value)
        .map_err(|e| ExtractError::Unknown(format!("JSON serialization failed: {e}")))?;
    text.push('\n');
    Ok(text)
}

/// Write `value` to `dest`. The parent directory must already exist.
pub fn write_json<T: Serialize + ?Sized>(dest: &Path, value: &T) -> Result<(), ExtractError> {
    let text = render_json(value)?;
    write_bytes(dest, text.as_bytes())
}

pub fn write_bytes(dest: &Path, bytes: &[u8]) -> Result<(), ExtractError> {
    fs::write(dest, bytes).map_err(|e| ExtractError::write(dest, e))
}
