//! Local file storage
//!
//! The local file store consumed by the shell and local path resolution.

pub mod filesystem;
pub mod validation;

pub use filesystem::{DiskStore, LocalFileStore};
pub use validation::resolve_local_path;
