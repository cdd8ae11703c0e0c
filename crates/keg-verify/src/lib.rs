//! Content verification for fetched artifacts.
//!
//! The digest algorithm is a pinned parameter of every [`ExpectedDigest`]; this
//! crate never infers it from the checksum's length.
//!
//! # Example
//!
//! ```
//! use keg_verify::{DigestAlgorithm, ExpectedDigest, verify};
//!
//! let expected = ExpectedDigest::from_hex(
//!     DigestAlgorithm::Sha256,
//!     "B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE9",
//! )
//! .unwrap();
//!
//! verify(b"hello world", &expected).unwrap();
//! assert!(verify(b"hello world!", &expected).is_err());
//! ```

pub use self::digest::{DigestAlgorithm, ExpectedDigest};
pub use self::error::{Result, VerifyError};
pub use self::hasher::{Blake3Hasher, Hasher, Sha256Hasher, Sha512Hasher, digest, hasher_for};
pub use self::reader::VerifiedReader;

mod digest;
mod error;
mod hasher;
mod reader;

/// Check `bytes` against `expected`.
///
/// Returns [`VerifyError::Mismatch`] with both hex values when they differ.
pub fn verify(bytes: &[u8], expected: &ExpectedDigest) -> Result<()> {
    let actual = hasher::digest(expected.algorithm(), bytes);
    let result = expected.check(actual);
    match &result {
        Ok(()) => tracing::debug!(algorithm = %expected.algorithm(), size = bytes.len(), "digest verified"),
        Err(e) => tracing::warn!(error = %e, "digest verification failed"),
    }
    result
}
