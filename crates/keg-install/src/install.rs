use std::path::{Path, PathBuf};

use keg_fs::{AtomicWriteOptions, PermissionMode, atomic_write};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstalledBinary {
    pub path: PathBuf,
    pub size: u64,
}

/// Place `binary` at `install_path` as an executable.
///
/// Missing parent directories are created. The bytes land in a temporary file
/// beside the destination which is synced and renamed over it, so readers see
/// either the previous file or the complete new one.
pub fn install(binary: &[u8], install_path: &Path) -> Result<InstalledBinary> {
    let options = AtomicWriteOptions::new()
        .permissions(PermissionMode::Executable)
        .create_parents(true);
    atomic_write(install_path, binary, options)?;

    tracing::info!(path = %install_path.display(), size = binary.len(), "binary installed");
    Ok(InstalledBinary {
        path: install_path.to_path_buf(),
        size: binary.len() as u64,
    })
}
