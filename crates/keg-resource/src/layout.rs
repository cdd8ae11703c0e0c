use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the installable binary lives inside the fetched artifact.
///
/// Always declared per version. Extraction never guesses a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveLayout {
    /// The fetched bytes are the executable.
    #[serde(alias = "bare")]
    BareBinary,
    /// Gzipped tarball with the executable at the archive root.
    #[serde(alias = "tar-gz")]
    TarGzWithRootBinary,
    /// Gzipped tarball with the executable under `bin/`.
    #[serde(alias = "tar-gz-bin")]
    TarGzWithBinSubdir,
}

impl ArchiveLayout {
    pub const fn is_archive(self) -> bool { !matches!(self, Self::BareBinary) }

    /// Directory inside the archive that holds the binary, `""` for the root.
    pub const fn entry_dir(self) -> Option<&'static str> {
        match self {
            Self::BareBinary => None,
            Self::TarGzWithRootBinary => Some(""),
            Self::TarGzWithBinSubdir => Some("bin"),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BareBinary => "bare-binary",
            Self::TarGzWithRootBinary => "tar-gz-with-root-binary",
            Self::TarGzWithBinSubdir => "tar-gz-with-bin-subdir",
        }
    }
}

impl fmt::Display for ArchiveLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown archive layout '{0}'")]
pub struct ParseLayoutError(pub String);

impl FromStr for ArchiveLayout {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bare-binary" | "bare" => Ok(Self::BareBinary),
            "tar-gz-with-root-binary" | "tar-gz" => Ok(Self::TarGzWithRootBinary),
            "tar-gz-with-bin-subdir" | "tar-gz-bin" => Ok(Self::TarGzWithBinSubdir),
            other => Err(ParseLayoutError(other.to_string())),
        }
    }
}
