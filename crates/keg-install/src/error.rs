use std::io;
use std::path::{Path, PathBuf};

use keg_archive::ExtractError;
use keg_fetch::FetchError;
use keg_verify::VerifyError;

use crate::pipeline::Stage;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("permission denied writing {}", path.display())]
    PermissionDenied {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no space left on device writing {}", path.display())]
    NoSpace {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied { path, .. } | Self::NoSpace { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

impl From<keg_fs::Error> for InstallError {
    fn from(e: keg_fs::Error) -> Self {
        match e {
            keg_fs::Error::PermissionDenied { path, source } => Self::PermissionDenied { path, source },
            keg_fs::Error::NoSpace { path, source } => Self::NoSpace { path, source },
            keg_fs::Error::Io { path, source } => Self::Io { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;

/// The first failure of a pipeline run. Stage errors are carried unmodified.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetch failed")]
    Fetch(#[from] FetchError),

    #[error("integrity check failed")]
    Verify(#[from] VerifyError),

    #[error("extraction failed")]
    Extract(#[from] ExtractError),

    #[error("install failed")]
    Install(#[from] InstallError),

    #[error("cancelled before {before}")]
    Cancelled { before: Stage },
}

impl PipelineError {
    /// True for cancellation between stages and inside the fetch.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::Fetch(FetchError::Cancelled { .. }))
    }

    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Fetch(_) => Stage::Fetch,
            Self::Verify(_) => Stage::Verify,
            Self::Extract(_) => Stage::Extract,
            Self::Install(_) => Stage::Install,
            Self::Cancelled { before } => *before,
        }
    }
}
