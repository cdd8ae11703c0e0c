use clap::Parser;

use crate::cli::{App, Commands};
use crate::config::KegConfig;

mod cli;
mod config;
mod logging;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = App::parse();
    logging::init(app.verbose, app.quiet);

    let config = KegConfig::load(app.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    match app.cmd {
        Commands::Install(arg) => cli::install::run(arg, &config, app.quiet).await,
        Commands::Verify(arg) => cli::verify::run(arg),
    }
}
