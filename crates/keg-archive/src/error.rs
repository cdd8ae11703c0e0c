use std::path::PathBuf;

use keg_resource::ArchiveLayout;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no {} binary found for layout {layout}", entry.as_deref().unwrap_or("executable"))]
    NotFound {
        layout: ArchiveLayout,
        entry:  Option<String>,
    },

    #[error("ambiguous binary for layout {layout}: {candidates:?}")]
    Ambiguous {
        layout:     ArchiveLayout,
        candidates: Vec<PathBuf>,
    },

    #[error("archive is corrupt: {reason}")]
    Corrupt { reason: String },

    #[error("archive entry '{}' escapes the extraction root", entry.display())]
    PathTraversal { entry: PathBuf },
}

impl ExtractError {
    pub(crate) fn corrupt(e: impl std::fmt::Display) -> Self { Self::Corrupt { reason: e.to_string() } }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
