use std::io;

use crate::DigestAlgorithm;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("{algorithm} digest mismatch: expected {expected}, got {actual}")]
    Mismatch {
        algorithm: DigestAlgorithm,
        expected:  String,
        actual:    String,
    },

    #[error("invalid {algorithm} digest '{digest}': {reason}")]
    InvalidDigest {
        algorithm: DigestAlgorithm,
        digest:    String,
        reason:    String,
    },

    #[error("unknown digest algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
