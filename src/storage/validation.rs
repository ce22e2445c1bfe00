//! Path resolution
//!
//! Resolves paths typed in the shell against the local working directory.

use std::path::{Component, Path, PathBuf};

/// Resolves `input` against `base` unless it is already absolute.
///
/// `.` and `..` components are folded lexically so the shell can report a
/// readable local directory.
pub fn resolve_local_path(base: &Path, input: &str) -> PathBuf {
    let joined = base.join(input);
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(resolved.components().next_back(), Some(Component::Normal(_))) {
                    resolved.pop();
                } else if !resolved.has_root() {
                    resolved.push(component);
                }
            }
            other => resolved.push(other),
        }
    }

    resolved
}
