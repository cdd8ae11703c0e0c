use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use super::install::InstallArg;
use super::verify::VerifyArg;

#[derive(Clone, Debug, Parser)]
#[command(name = "keg", version, about, long_about = None, propagate_version = true)]
pub struct App {
    /// Configuration file (default: ~/.config/keg/config.toml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More output; repeat for trace logs.
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only warnings and errors, no progress bar.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "i", name = "install", about = "Fetch, verify and install a formula")]
    Install(InstallArg),
    #[command(name = "verify", about = "Check a local file against a digest")]
    Verify(VerifyArg),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use keg_verify::DigestAlgorithm;

    use super::*;

    #[test]
    fn command_is_well_formed() { App::command().debug_assert(); }

    #[test]
    fn parses_install_with_overrides() {
        let app = App::try_parse_from(["keg", "-vv", "install", "wilson.toml", "--install-dir", "/opt/bin"]).unwrap();
        assert_eq!(app.verbose, 2);
        let Commands::Install(arg) = app.cmd else { panic!("expected install") };
        assert_eq!(arg.formula, PathBuf::from("wilson.toml"));
        assert_eq!(arg.install_dir, Some(PathBuf::from("/opt/bin")));
        assert_eq!(arg.install_path, None);
    }

    #[test]
    fn install_dir_and_path_conflict() {
        let res = App::try_parse_from([
            "keg",
            "install",
            "wilson.toml",
            "--install-dir",
            "/opt/bin",
            "--install-path",
            "/opt/bin/wilson",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn verify_defaults_to_sha256() {
        let app = App::try_parse_from(["keg", "verify", "wilson", "--digest", "abc"]).unwrap();
        let Commands::Verify(arg) = app.cmd else { panic!("expected verify") };
        assert_eq!(arg.algorithm, DigestAlgorithm::Sha256);

        let app = App::try_parse_from(["keg", "verify", "wilson", "--digest", "abc", "--algorithm", "blake3"]).unwrap();
        let Commands::Verify(arg) = app.cmd else { panic!("expected verify") };
        assert_eq!(arg.algorithm, DigestAlgorithm::Blake3);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(App::try_parse_from(["keg", "-q", "-v", "verify", "f", "--digest", "ab"]).is_err());
    }
}
