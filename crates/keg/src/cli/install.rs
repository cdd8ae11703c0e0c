use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use keg_fetch::{CancellationToken, Fetcher, ReqwestClient};
use keg_install::Pipeline;
use keg_resource::{ArtifactDescriptor, FormulaRecord};

use crate::config::KegConfig;
use crate::ui::DownloadTracker;

#[derive(Clone, Debug, Args)]
pub struct InstallArg {
    /// Formula record (TOML).
    pub formula: PathBuf,

    /// Install as DIR/<name>, overriding the formula.
    #[arg(long, value_name = "DIR", conflicts_with = "install_path")]
    pub install_dir: Option<PathBuf>,

    /// Install to exactly this path, overriding the formula.
    #[arg(long, value_name = "PATH")]
    pub install_path: Option<PathBuf>,
}

impl InstallArg {
    fn descriptor(&self, config: &KegConfig) -> Result<ArtifactDescriptor> {
        let mut record = FormulaRecord::load(&self.formula)
            .with_context(|| format!("failed to read formula {}", self.formula.display()))?;

        if let Some(path) = &self.install_path {
            record.install_path = Some(path.clone());
            record.install_dir = None;
        } else if let Some(dir) = &self.install_dir {
            record.install_dir = Some(dir.clone());
            record.install_path = None;
        }

        record
            .into_descriptor(config.install_dir.as_deref())
            .with_context(|| format!("invalid formula {}", self.formula.display()))
    }
}

pub async fn run(arg: InstallArg, config: &KegConfig, quiet: bool) -> Result<()> {
    let descriptor = arg.descriptor(config)?;

    let tracker = DownloadTracker::new(descriptor.name(), quiet);
    let progress = tracker.clone();
    let options = config.fetch.to_options().on_progress(move |p| progress.update(p));
    let client = ReqwestClient::new(&options).context("failed to build HTTP client")?;
    let pipeline = Pipeline::new(Fetcher::new(client, options));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            on_signal.cancel();
        }
    });

    let result = pipeline.run(&descriptor, &cancel).await;
    tracker.finish();

    let report = result.with_context(|| {
        format!(
            "failed to install {} {} from {}",
            descriptor.name(),
            descriptor.version(),
            descriptor.source_url()
        )
    })?;

    println!(
        "installed {} {} -> {} ({})",
        report.name,
        report.version,
        report.path.display(),
        report.digest
    );
    Ok(())
}
