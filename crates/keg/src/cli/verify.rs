use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use keg_verify::{DigestAlgorithm, ExpectedDigest, VerifiedReader};

#[derive(Clone, Debug, Args)]
pub struct VerifyArg {
    pub file: PathBuf,

    /// Expected digest, hex encoded.
    #[arg(long, value_name = "HEX")]
    pub digest: String,

    #[arg(long, value_name = "ALG", default_value_t = DigestAlgorithm::Sha256)]
    pub algorithm: DigestAlgorithm,
}

pub fn run(arg: VerifyArg) -> Result<()> {
    let expected = ExpectedDigest::from_hex(arg.algorithm, &arg.digest).context("invalid --digest")?;
    let size = check(&arg.file, expected.clone())?;
    println!("{}: OK ({expected}, {size} bytes)", arg.file.display());
    Ok(())
}

fn check(path: &std::path::Path, expected: ExpectedDigest) -> Result<u64> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = VerifiedReader::new(BufReader::new(file), expected);
    io::copy(&mut reader, &mut io::sink()).with_context(|| format!("failed to read {}", path.display()))?;
    reader
        .finish()
        .with_context(|| format!("{} does not match", path.display()))
}

#[cfg(test)]
mod tests {
    use keg_verify::{VerifyError, digest};

    use super::*;

    #[test]
    fn streams_file_through_verifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wilson");
        std::fs::write(&path, b"wilson binary").unwrap();

        for algorithm in DigestAlgorithm::ALL {
            let hex = hex_of(algorithm, b"wilson binary");
            let expected = ExpectedDigest::from_hex(algorithm, &hex).unwrap();
            assert_eq!(check(&path, expected).unwrap(), 13);
        }
    }

    #[test]
    fn mismatch_keeps_verify_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wilson");
        std::fs::write(&path, b"tampered").unwrap();

        let expected = ExpectedDigest::from_hex(DigestAlgorithm::Sha256, &hex_of(DigestAlgorithm::Sha256, b"original")).unwrap();
        let err = check(&path, expected).unwrap_err();
        assert!(matches!(err.downcast_ref::<VerifyError>(), Some(VerifyError::Mismatch { .. })));
    }

    fn hex_of(algorithm: DigestAlgorithm, data: &[u8]) -> String {
        digest(algorithm, data).iter().map(|b| format!("{b:02x}")).collect()
    }
}
