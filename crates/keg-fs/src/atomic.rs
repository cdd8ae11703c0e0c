use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, from_io};
use crate::permissions::PermissionMode;

#[derive(Clone, Copy, Debug)]
pub struct AtomicWriteOptions {
    permissions:    PermissionMode,
    sync:           bool,
    create_parents: bool,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self { Self::new() }
}

impl AtomicWriteOptions {
    pub fn new() -> Self {
        Self {
            permissions:    PermissionMode::Inherit,
            sync:           true,
            create_parents: false,
        }
    }

    pub fn permissions(mut self, permissions: PermissionMode) -> Self {
        self.permissions = permissions;
        self
    }

    /// fsync the file before the rename and the directory after it.
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// Readers of `path` see either the previous file or the complete new one.
/// The temporary file is removed on every failure path.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: AtomicWriteOptions) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if options.create_parents {
        fs::create_dir_all(parent).map_err(|e| from_io(parent, e))?;
    }

    let mut tmp = tempfile::Builder::new()
        .prefix(".keg-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| from_io(parent, e))?;
    tracing::trace!(tmp = %tmp.path().display(), path = %path.display(), "staging write");

    stage(&mut tmp, content, &options).map_err(|e| from_io(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| from_io(path, e.error))?;

    if options.sync {
        sync_dir(parent).map_err(|e| from_io(parent, e))?;
    }

    Ok(())
}

fn stage(tmp: &mut NamedTempFile, content: &[u8], options: &AtomicWriteOptions) -> io::Result<()> {
    tmp.write_all(content)?;
    options.permissions.apply(tmp.as_file())?;
    if options.sync {
        tmp.as_file().sync_all()?;
    }
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> { fs::File::open(dir)?.sync_all() }

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> { Ok(()) }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wilson");
        atomic_write(&path, b"hello world", AtomicWriteOptions::new()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello world");
    }

    #[cfg(unix)]
    #[test]
    fn applies_executable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("wilson");
        atomic_write(&path, b"data", AtomicWriteOptions::new().permissions(PermissionMode::Executable)).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
