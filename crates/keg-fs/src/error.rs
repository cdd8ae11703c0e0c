use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no space left on device: {}", path.display())]
    NoSpace {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied { path, .. } | Self::NoSpace { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Classify an I/O failure at `path`.
pub fn from_io(path: &Path, source: io::Error) -> Error {
    let path = path.to_path_buf();
    match source.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
            Error::PermissionDenied { path, source }
        }
        io::ErrorKind::StorageFull => Error::NoSpace { path, source },
        _ => Error::Io { path, source },
    }
}
