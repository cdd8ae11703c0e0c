use std::path::PathBuf;

use keg_verify::VerifyError;

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("missing required field '{0}'")]
    Missing(&'static str),

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("invalid version '{0}'")]
    InvalidVersion(String),

    #[error("unknown placeholder '{{{placeholder}}}' in url template '{template}'")]
    UnknownPlaceholder { template: String, placeholder: String },

    #[error("unterminated placeholder in url template '{0}'")]
    UnterminatedPlaceholder(String),

    #[error("invalid source url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Digest(#[from] VerifyError),

    #[error("invalid entry name '{0}'")]
    InvalidEntryName(String),

    #[error("entry name '{0}' given for a bare binary artifact")]
    EntryNameWithoutArchive(String),

    #[error("invalid install path '{}'", .0.display())]
    InvalidInstallPath(PathBuf),

    #[error("conflicting fields: {0}")]
    Conflict(&'static str),

    #[error("formula file not found: {}", .0.display())]
    FormulaNotFound(PathBuf),

    #[error("failed to load formula: {0}")]
    Load(#[from] Box<figment::Error>),
}

pub type Result<T> = std::result::Result<T, DescriptorError>;
