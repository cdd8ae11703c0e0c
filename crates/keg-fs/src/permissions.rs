use std::fs::File;
use std::io;

/// File permission modes applied to installed files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionMode {
    /// Leave whatever the temp file was created with.
    #[default]
    Inherit,

    /// `0o755` on Unix.
    Executable,
}

impl PermissionMode {
    /// Unix mode bits, `None` for [`PermissionMode::Inherit`].
    pub fn unix_mode(self) -> Option<u32> {
        match self {
            Self::Inherit => None,
            Self::Executable => Some(0o755),
        }
    }

    /// Apply to an open file handle.
    ///
    /// Windows has no execute bit; only `Inherit` semantics apply there.
    pub fn apply(self, file: &File) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = self.unix_mode() {
                file.set_permissions(std::fs::Permissions::from_mode(mode))?;
            }
        }
        #[cfg(not(unix))]
        let _ = file;
        Ok(())
    }
}
