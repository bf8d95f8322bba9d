//! Small shared helpers

pub mod hashing;
pub mod paths;

pub use hashing::content_digest;
pub use paths::output_file_name;
