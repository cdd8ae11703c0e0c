use std::path::{Component, Path, PathBuf};

use crate::error::{ExtractError, Result};

/// Normalize an archive member path relative to the archive root.
///
/// `.` components are dropped and `..` pops the previous component. Absolute
/// paths, and `..` that would climb above the root, are rejected.
pub fn sanitize_entry_path(entry: &Path) -> Result<PathBuf> {
    resolve_within_root(PathBuf::new(), entry, entry)
}

/// Check where a link entry points.
///
/// Symlink targets resolve against the link's own directory, hard link targets
/// against the archive root. Absolute targets are always rejected.
pub fn sanitize_link_target(link: &Path, target: &Path, hard: bool) -> Result<PathBuf> {
    let start = if hard {
        PathBuf::new()
    } else {
        link.parent().map(Path::to_path_buf).unwrap_or_default()
    };
    resolve_within_root(start, target, link)
}

fn resolve_within_root(mut resolved: PathBuf, path: &Path, reported: &Path) -> Result<PathBuf> {
    let escape = || ExtractError::PathTraversal {
        entry: reported.to_path_buf(),
    };

    for component in path.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(escape());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(escape()),
        }
    }

    Ok(resolved)
}
