use std::io::Read;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use keg_resource::ArchiveLayout;

use crate::error::{ExtractError, Result};
use crate::sanitize::{sanitize_entry_path, sanitize_link_target};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Largest buffer reserved up front from a tar header's size field.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Locate the installable binary inside fetched bytes.
///
/// `BareBinary` bytes pass through unchanged. For tarball layouts the whole
/// archive is read in memory: every member path and link target is sanitized,
/// then exactly one file must sit at the layout location. Without `entry_name`
/// only executable files count; with it, the file of that name is taken
/// whatever its mode. Nothing is written to disk.
pub fn extract(bytes: &[u8], layout: ArchiveLayout, entry_name: Option<&str>) -> Result<Vec<u8>> {
    let Some(dir) = layout.entry_dir() else {
        return Ok(bytes.to_vec());
    };

    if !bytes.starts_with(&GZIP_MAGIC) {
        return Err(ExtractError::Corrupt {
            reason: "not a gzip stream".into(),
        });
    }

    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let mut candidates: Vec<(PathBuf, Vec<u8>)> = Vec::new();

    for entry in archive.entries().map_err(ExtractError::corrupt)? {
        let mut entry = entry.map_err(ExtractError::corrupt)?;
        let raw = entry.path().map_err(ExtractError::corrupt)?.into_owned();
        let path = sanitize_entry_path(&raw)?;
        let kind = entry.header().entry_type();

        if kind.is_symlink() || kind.is_hard_link() {
            let target = entry
                .link_name()
                .map_err(ExtractError::corrupt)?
                .ok_or_else(|| ExtractError::corrupt(format!("link '{}' has no target", raw.display())))?;
            sanitize_link_target(&path, &target, kind.is_hard_link())?;
            continue;
        }

        if !kind.is_file() || !at_layout_location(&path, dir, entry_name) {
            continue;
        }
        if entry_name.is_none() && !is_executable(entry.header())? {
            tracing::trace!(entry = %path.display(), "skipping non-executable file");
            continue;
        }

        let mut data = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
        entry.read_to_end(&mut data).map_err(ExtractError::corrupt)?;
        tracing::debug!(entry = %path.display(), size = data.len(), "binary candidate");
        candidates.push((path, data));
    }

    match candidates.len() {
        0 => Err(ExtractError::NotFound {
            layout,
            entry: entry_name.map(str::to_string),
        }),
        1 => {
            let (path, data) = candidates.remove(0);
            tracing::debug!(entry = %path.display(), %layout, "extracted binary");
            Ok(data)
        }
        _ => Err(ExtractError::Ambiguous {
            layout,
            candidates: candidates.into_iter().map(|(path, _)| path).collect(),
        }),
    }
}

fn is_executable(header: &tar::Header) -> Result<bool> {
    let mode = header.mode().map_err(ExtractError::corrupt)?;
    Ok(mode & 0o111 != 0)
}

/// Whether `path` is a file directly inside `dir` (`""` is the root).
fn at_layout_location(path: &Path, dir: &str, entry_name: Option<&str>) -> bool {
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    let file_name = match (dir, parts.as_slice()) {
        ("", [file]) => file,
        (dir, [parent, file]) if !dir.is_empty() && *parent == dir => file,
        _ => return false,
    };

    entry_name.is_none_or(|name| *file_name == name)
}
