use tracing_subscriber::EnvFilter;

const CRATES: [&str; 7] = [
    "keg",
    "keg_archive",
    "keg_fetch",
    "keg_fs",
    "keg_install",
    "keg_resource",
    "keg_verify",
];

/// Log level for our own crates when `RUST_LOG` is unset.
fn level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn default_directives(verbose: u8, quiet: bool) -> String {
    let level = level(verbose, quiet);
    let mut directives = String::from("warn");
    for name in CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// command output.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 0)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level(0, false), "info");
        assert_eq!(level(1, false), "debug");
        assert_eq!(level(4, false), "trace");
        assert_eq!(level(2, true), "warn");
    }

    #[test]
    fn directives_cover_every_crate() {
        let directives = default_directives(1, false);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("keg_fetch=debug"));
        assert!(directives.contains("keg_install=debug"));
        EnvFilter::try_new(&directives).unwrap();
    }
}
