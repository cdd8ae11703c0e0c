use std::path::{Component, Path, PathBuf};

use keg_verify::{DigestAlgorithm, ExpectedDigest};
use url::Url;

use crate::error::{DescriptorError, Result};
use crate::layout::ArchiveLayout;
use crate::template::expand_url_template;

/// Immutable description of one installable artifact version.
///
/// Built once per install through [`DescriptorBuilder`] and only read
/// afterwards. Targeting another version means building a new descriptor, for
/// example with [`ArtifactDescriptor::to_builder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    name:            String,
    version:         String,
    url_template:    String,
    source_url:      Url,
    expected_digest: ExpectedDigest,
    archive_layout:  ArchiveLayout,
    entry_name:      Option<String>,
    install_path:    PathBuf,
}

impl ArtifactDescriptor {
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            name: name.into(),
            version: version.into(),
            ..DescriptorBuilder::default()
        }
    }

    /// A builder seeded with this descriptor's fields.
    ///
    /// The URL template is kept, so changing the version re-expands it. The
    /// digest is kept as well and normally needs replacing too.
    pub fn to_builder(&self) -> DescriptorBuilder {
        DescriptorBuilder {
            name:         self.name.clone(),
            version:      self.version.clone(),
            url:          Some(self.url_template.clone()),
            digest:       Some(DigestInput::Parsed(self.expected_digest.clone())),
            layout:       Some(self.archive_layout),
            entry_name:   self.entry_name.clone(),
            install_path: Some(InstallTarget::Path(self.install_path.clone())),
        }
    }

    /// The same artifact at another version. The URL template is re-expanded
    /// and the new digest validated like any other build.
    pub fn with_version(
        &self,
        version: impl Into<String>,
        algorithm: DigestAlgorithm,
        hex: impl Into<String>,
    ) -> Result<ArtifactDescriptor> {
        self.to_builder().version(version).digest(algorithm, hex).build()
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn version(&self) -> &str { &self.version }

    pub fn source_url(&self) -> &Url { &self.source_url }

    pub fn expected_digest(&self) -> &ExpectedDigest { &self.expected_digest }

    pub fn archive_layout(&self) -> ArchiveLayout { self.archive_layout }

    pub fn entry_name(&self) -> Option<&str> { self.entry_name.as_deref() }

    pub fn install_path(&self) -> &Path { &self.install_path }
}

#[derive(Clone, Debug)]
enum DigestInput {
    Hex(DigestAlgorithm, String),
    Parsed(ExpectedDigest),
}

#[derive(Clone, Debug)]
enum InstallTarget {
    Path(PathBuf),
    Dir(PathBuf),
}

/// Validating builder for [`ArtifactDescriptor`].
#[derive(Clone, Debug, Default)]
pub struct DescriptorBuilder {
    name:         String,
    version:      String,
    url:          Option<String>,
    digest:       Option<DigestInput>,
    layout:       Option<ArchiveLayout>,
    entry_name:   Option<String>,
    install_path: Option<InstallTarget>,
}

impl DescriptorBuilder {
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Source URL, optionally containing `{name}` / `{version}` placeholders.
    #[must_use]
    pub fn url(mut self, template: impl Into<String>) -> Self {
        self.url = Some(template.into());
        self
    }

    #[must_use]
    pub fn digest(mut self, algorithm: DigestAlgorithm, hex: impl Into<String>) -> Self {
        self.digest = Some(DigestInput::Hex(algorithm, hex.into()));
        self
    }

    #[must_use]
    pub fn sha256(self, hex: impl Into<String>) -> Self { self.digest(DigestAlgorithm::Sha256, hex) }

    #[must_use]
    pub fn layout(mut self, layout: ArchiveLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// File name of the binary inside the archive.
    #[must_use]
    pub fn entry_name(mut self, entry: impl Into<String>) -> Self {
        self.entry_name = Some(entry.into());
        self
    }

    #[must_use]
    pub fn install_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_path = Some(InstallTarget::Path(path.into()));
        self
    }

    /// Install as `dir/<name>`.
    #[must_use]
    pub fn install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_path = Some(InstallTarget::Dir(dir.into()));
        self
    }

    pub fn build(self) -> Result<ArtifactDescriptor> {
        validate_name(&self.name)?;
        validate_version(&self.version)?;

        let url_template = self.url.ok_or(DescriptorError::Missing("url"))?;
        let source_url = parse_source_url(&expand_url_template(&url_template, &self.name, &self.version)?)?;

        let expected_digest = match self.digest.ok_or(DescriptorError::Missing("digest"))? {
            DigestInput::Hex(algorithm, hex) => ExpectedDigest::from_hex(algorithm, &hex)?,
            DigestInput::Parsed(digest) => digest,
        };

        let archive_layout = self.layout.ok_or(DescriptorError::Missing("layout"))?;
        if let Some(entry) = &self.entry_name {
            if !archive_layout.is_archive() {
                return Err(DescriptorError::EntryNameWithoutArchive(entry.clone()));
            }
            if !is_plain_file_name(entry) {
                return Err(DescriptorError::InvalidEntryName(entry.clone()));
            }
        }

        let install_path = match self.install_path.ok_or(DescriptorError::Missing("install_path"))? {
            InstallTarget::Path(path) => path,
            InstallTarget::Dir(dir) => dir.join(&self.name),
        };
        if install_path.file_name().is_none() {
            return Err(DescriptorError::InvalidInstallPath(install_path));
        }

        Ok(ArtifactDescriptor {
            name: self.name,
            version: self.version,
            url_template,
            source_url,
            expected_digest,
            archive_layout,
            entry_name: self.entry_name,
            install_path,
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    if is_plain_file_name(name) {
        Ok(())
    } else {
        Err(DescriptorError::InvalidName(name.to_string()))
    }
}

fn validate_version(version: &str) -> Result<()> {
    let ok = !version.is_empty()
        && !version.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\');
    if ok { Ok(()) } else { Err(DescriptorError::InvalidVersion(version.to_string())) }
}

fn parse_source_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| DescriptorError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// A single normal path component.
fn is_plain_file_name(s: &str) -> bool {
    if s.is_empty() || s.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(s).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}
