//! Lexical path resolution for archive entries.

use std::path::{Component, Path, PathBuf};

/// Normalize `path` without touching the filesystem.
///
/// `.` components are dropped and `..` removes the previous normal
/// component. A `..` that cannot be resolved is kept, so a relative path
/// that climbs above its start stays visibly outside of it.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Join `entry_name` onto `base` and return the result only if it stays
/// inside `base` after normalization.
pub fn resolve_within(base: &Path, entry_name: &str) -> Option<PathBuf> {
    let base = normalize(base);
    let resolved = normalize(&base.join(entry_name));
    if resolved.starts_with(&base) {
        Some(resolved)
    } else {
        None
    }
}
