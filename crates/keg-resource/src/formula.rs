use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Toml};
use keg_verify::DigestAlgorithm;
use serde::{Deserialize, Serialize};

use crate::descriptor::ArtifactDescriptor;
use crate::error::{DescriptorError, Result};
use crate::layout::ArchiveLayout;

/// Plain data form of a formula, as read from a TOML file.
///
/// ```toml
/// name = "wilson"
/// version = "0.1.0"
/// url = "https://github.com/trntv/wilson/releases/download/{version}/wilson-darwin-amd64.tar.gz"
/// sha256 = "635034cc0c389e8a169e9752835eb8fe0a2e3304cde0d1904178712db1716e2e"
/// layout = "tar-gz-with-bin-subdir"
/// entry = "wilson_darwin_amd64"
/// install_dir = "/usr/local/bin"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaRecord {
    pub name:         String,
    pub version:      String,
    pub url:          String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256:       Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest:       Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm:    Option<DigestAlgorithm>,
    pub layout:       ArchiveLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry:        Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir:  Option<PathBuf>,
}

impl FormulaRecord {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DescriptorError::FormulaNotFound(path.to_path_buf()));
        }
        Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DescriptorError::Load(Box::new(e)))
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Figment::new()
            .merge(Toml::string(source))
            .extract()
            .map_err(|e| DescriptorError::Load(Box::new(e)))
    }

    /// Build the descriptor. `default_install_dir` is used only when the record
    /// names neither `install_path` nor `install_dir`.
    pub fn into_descriptor(self, default_install_dir: Option<&Path>) -> Result<ArtifactDescriptor> {
        let (algorithm, hex) = match (self.sha256, self.digest, self.algorithm) {
            (Some(_), Some(_), _) => return Err(DescriptorError::Conflict("sha256 and digest")),
            (Some(hex), None, None | Some(DigestAlgorithm::Sha256)) => (DigestAlgorithm::Sha256, hex),
            (Some(_), None, Some(_)) => return Err(DescriptorError::Conflict("sha256 and algorithm")),
            (None, Some(hex), Some(algorithm)) => (algorithm, hex),
            (None, Some(_), None) => return Err(DescriptorError::Missing("algorithm")),
            (None, None, _) => return Err(DescriptorError::Missing("sha256")),
        };

        let mut builder = ArtifactDescriptor::builder(self.name, self.version)
            .url(self.url)
            .digest(algorithm, hex)
            .layout(self.layout);

        if let Some(entry) = self.entry {
            builder = builder.entry_name(entry);
        }

        builder = match (self.install_path, self.install_dir, default_install_dir) {
            (Some(_), Some(_), _) => return Err(DescriptorError::Conflict("install_path and install_dir")),
            (Some(path), None, _) => builder.install_path(path),
            (None, Some(dir), _) => builder.install_dir(dir),
            (None, None, Some(dir)) => builder.install_dir(dir),
            (None, None, None) => return Err(DescriptorError::Missing("install_path")),
        };

        builder.build()
    }
}

impl TryFrom<FormulaRecord> for ArtifactDescriptor {
    type Error = DescriptorError;

    fn try_from(record: FormulaRecord) -> Result<Self> { record.into_descriptor(None) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "635034cc0c389e8a169e9752835eb8fe0a2e3304cde0d1904178712db1716e2e";

    fn record_toml(extra: &str) -> String {
        format!(
            r#"
name = "wilson"
version = "0.1.0"
url = "https://github.com/trntv/wilson/releases/download/{{version}}/wilson-darwin-amd64.tar.gz"
layout = "tar-gz-with-bin-subdir"
entry = "wilson_darwin_amd64"
{extra}
"#
        )
    }

    #[test]
    fn decodes_sha256_record() {
        let toml = record_toml(&format!("sha256 = \"{SHA}\"\ninstall_dir = \"/usr/local/bin\""));
        let d = ArtifactDescriptor::try_from(FormulaRecord::from_toml_str(&toml).unwrap()).unwrap();

        assert_eq!(d.archive_layout(), ArchiveLayout::TarGzWithBinSubdir);
        assert_eq!(d.entry_name(), Some("wilson_darwin_amd64"));
        assert_eq!(d.install_path(), Path::new("/usr/local/bin/wilson"));
        assert!(d.source_url().as_str().contains("/download/0.1.0/"));
    }

    #[test]
    fn explicit_algorithm_is_pinned() {
        let blake = "ab".repeat(32);
        let toml = record_toml(&format!(
            "digest = \"{blake}\"\nalgorithm = \"blake3\"\ninstall_path = \"/tmp/wilson\""
        ));
        let d = ArtifactDescriptor::try_from(FormulaRecord::from_toml_str(&toml).unwrap()).unwrap();
        assert_eq!(d.expected_digest().algorithm(), DigestAlgorithm::Blake3);
    }

    #[test]
    fn digest_without_algorithm_is_rejected() {
        let toml = record_toml(&format!("digest = \"{SHA}\"\ninstall_path = \"/tmp/wilson\""));
        let err = FormulaRecord::from_toml_str(&toml).unwrap().into_descriptor(None).unwrap_err();
        assert!(matches!(err, DescriptorError::Missing("algorithm")));
    }

    #[test]
    fn default_install_dir_applies_last() {
        let toml = record_toml(&format!("sha256 = \"{SHA}\""));
        let record = FormulaRecord::from_toml_str(&toml).unwrap();

        assert!(matches!(
            record.clone().into_descriptor(None),
            Err(DescriptorError::Missing("install_path"))
        ));
        let d = record.into_descriptor(Some(Path::new("/home/me/.local/bin"))).unwrap();
        assert_eq!(d.install_path(), Path::new("/home/me/.local/bin/wilson"));
    }

    #[test]
    fn conflicting_digests_are_rejected() {
        let toml = record_toml(&format!(
            "sha256 = \"{SHA}\"\ndigest = \"{SHA}\"\nalgorithm = \"sha256\"\ninstall_path = \"/tmp/w\""
        ));
        let err = FormulaRecord::from_toml_str(&toml).unwrap().into_descriptor(None).unwrap_err();
        assert!(matches!(err, DescriptorError::Conflict(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wilson.toml");
        std::fs::write(&path, record_toml(&format!("sha256 = \"{SHA}\"\ninstall_path = \"/tmp/w\""))).unwrap();

        let record = FormulaRecord::load(&path).unwrap();
        assert_eq!(record.name, "wilson");

        let missing = FormulaRecord::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, DescriptorError::FormulaNotFound(_)));
    }
}
