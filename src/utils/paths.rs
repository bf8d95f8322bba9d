//! Path normalization

use std::path::Path;

/// Reduce a declared output location to the bare file name the job produces.
///
/// Strips a leading `file:` scheme and any directory components, after
/// normalizing backslashes to forward slashes.
pub fn output_file_name(declared: &str) -> String {
    let normalized = declared.trim().replace('\\', "/");
    let without_scheme = normalized.strip_prefix("file:").unwrap_or(&normalized);
    Path::new(without_scheme)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(without_scheme)
        .to_string()
}
