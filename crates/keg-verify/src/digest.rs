use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifyError};

/// Hash function an expected digest was produced with.
///
/// The algorithm is always pinned next to the digest value. Hex length alone is
/// never used to pick one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    #[serde(alias = "sha-256")]
    Sha256,
    #[serde(alias = "sha-512")]
    Sha512,
    Blake3,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 3] = [Self::Sha256, Self::Sha512, Self::Blake3];

    /// Digest size in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 | Self::Blake3 => 32,
            Self::Sha512 => 64,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for DigestAlgorithm {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            "blake3" => Ok(Self::Blake3),
            _ => Err(VerifyError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A decoded checksum together with the algorithm that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedDigest {
    algorithm: DigestAlgorithm,
    bytes:     Vec<u8>,
}

impl ExpectedDigest {
    /// Parse a hex digest. Case-insensitive; surrounding whitespace is ignored.
    ///
    /// Fails when the value is empty, not hex, or its decoded length differs
    /// from what `algorithm` produces.
    pub fn from_hex(algorithm: DigestAlgorithm, hex_digest: &str) -> Result<Self> {
        let trimmed = hex_digest.trim();
        let invalid = |reason: String| VerifyError::InvalidDigest {
            algorithm,
            digest: hex_digest.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("digest is empty".into()));
        }

        let bytes = hex::decode(trimmed.to_ascii_lowercase()).map_err(|e| invalid(e.to_string()))?;
        if bytes.len() != algorithm.output_len() {
            return Err(invalid(format!(
                "expected {} hex characters, found {}",
                algorithm.output_len() * 2,
                trimmed.len()
            )));
        }

        Ok(Self { algorithm, bytes })
    }

    pub fn algorithm(&self) -> DigestAlgorithm { self.algorithm }

    pub fn as_bytes(&self) -> &[u8] { &self.bytes }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String { hex::encode(&self.bytes) }

    pub(crate) fn check(&self, actual: Vec<u8>) -> Result<()> {
        if actual == self.bytes {
            Ok(())
        } else {
            Err(VerifyError::Mismatch {
                algorithm: self.algorithm,
                expected:  self.to_hex(),
                actual:    hex::encode(actual),
            })
        }
    }
}

impl fmt::Display for ExpectedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}
