//! Pipeline - drives one descriptor from URL to installed binary.

use std::fmt;
use std::path::PathBuf;

use keg_fetch::{CancellationToken, Fetcher, HttpClient};
use keg_resource::ArtifactDescriptor;
use keg_verify::ExpectedDigest;
use tracing::Instrument;

use crate::error::PipelineError;
use crate::install::install;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Verify,
    Extract,
    Install,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Verify => "verify",
            Self::Extract => "extract",
            Self::Install => "install",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallReport {
    pub name:    String,
    pub version: String,
    pub path:    PathBuf,
    /// Size of the installed binary, not of the download.
    pub size:    u64,
    /// Digest the downloaded artifact was verified against.
    pub digest:  ExpectedDigest,
}

/// The install orchestrator.
///
/// Stages run strictly in order and the first error ends the run. Nothing
/// touches the filesystem before the install stage, so a failed or cancelled
/// run leaves the install path as it was.
pub struct Pipeline<C: HttpClient> {
    fetcher: Fetcher<C>,
}

impl<C: HttpClient> Pipeline<C> {
    pub fn new(fetcher: Fetcher<C>) -> Self { Self { fetcher } }

    pub async fn run(
        &self,
        descriptor: &ArtifactDescriptor,
        cancel: &CancellationToken,
    ) -> Result<InstallReport, PipelineError> {
        let span = tracing::info_span!(
            "install",
            name = descriptor.name(),
            version = descriptor.version(),
        );
        self.run_stages(descriptor, cancel).instrument(span).await
    }

    async fn run_stages(
        &self,
        descriptor: &ArtifactDescriptor,
        cancel: &CancellationToken,
    ) -> Result<InstallReport, PipelineError> {
        checkpoint(cancel, Stage::Fetch)?;
        tracing::info!(stage = %Stage::Fetch, url = %descriptor.source_url(), "fetching");
        let artifact = self.fetcher.fetch(descriptor.source_url(), cancel).await?;

        checkpoint(cancel, Stage::Verify)?;
        let expected = descriptor.expected_digest();
        tracing::debug!(stage = %Stage::Verify, algorithm = %expected.algorithm(), size = artifact.len());
        keg_verify::verify(&artifact, expected)?;

        checkpoint(cancel, Stage::Extract)?;
        let layout = descriptor.archive_layout();
        tracing::debug!(stage = %Stage::Extract, %layout, entry = descriptor.entry_name());
        let binary = keg_archive::extract(&artifact, layout, descriptor.entry_name())?;
        drop(artifact);

        checkpoint(cancel, Stage::Install)?;
        tracing::debug!(stage = %Stage::Install, path = %descriptor.install_path().display());
        let installed = install(&binary, descriptor.install_path())?;

        Ok(InstallReport {
            name:    descriptor.name().to_string(),
            version: descriptor.version().to_string(),
            path:    installed.path,
            size:    installed.size,
            digest:  expected.clone(),
        })
    }
}

fn checkpoint(cancel: &CancellationToken, before: Stage) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        tracing::info!(stage = %before, "cancelled");
        return Err(PipelineError::Cancelled { before });
    }
    Ok(())
}
