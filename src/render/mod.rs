//! Output rendering (environment snapshot, expanded parameter-set, artifact info)

pub mod json;

pub use json::{render_json, write_bytes, write_json};
