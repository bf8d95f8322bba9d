//! Stable content digests

use sha2::{Digest, Sha256};

/// Hex SHA-256 of `bytes`, truncated to 16 characters.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)[..16].to_string()
}
