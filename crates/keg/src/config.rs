use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use keg_fetch::FetchOptions;
use serde::{Deserialize, Serialize};

/// Settings layered from defaults, a TOML file and `KEG_*` variables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KegConfig {
    /// Used when a formula names neither `install_path` nor `install_dir`.
    pub install_dir: Option<PathBuf>,
    pub fetch:       FetchConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms:    u64,
    pub max_retries:        u32,
    pub backoff_base_ms:    u64,
    pub backoff_cap_ms:     u64,
    pub max_redirects:      u32,
    pub user_agent:         String,
    /// Extra request headers, e.g. `Authorization` for private release assets.
    pub headers:            BTreeMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let options = FetchOptions::default();
        Self {
            connect_timeout_ms: millis(options.connect_timeout),
            read_timeout_ms:    millis(options.read_timeout),
            max_retries:        options.max_retries,
            backoff_base_ms:    millis(options.retry_backoff),
            backoff_cap_ms:     millis(options.retry_backoff_cap),
            max_redirects:      options.max_redirects,
            user_agent:         options.user_agent,
            headers:            BTreeMap::new(),
        }
    }
}

fn millis(d: Duration) -> u64 { d.as_millis().try_into().unwrap_or(u64::MAX) }

impl FetchConfig {
    pub fn to_options(&self) -> FetchOptions {
        let options = self
            .headers
            .iter()
            .fold(FetchOptions::default(), |options, (name, value)| options.header(name, value));
        options
            .timeouts(
                Duration::from_millis(self.connect_timeout_ms),
                Duration::from_millis(self.read_timeout_ms),
            )
            .max_retries(self.max_retries)
            .retry_backoff(
                Duration::from_millis(self.backoff_base_ms),
                Duration::from_millis(self.backoff_cap_ms),
            )
            .max_redirects(self.max_redirects)
            .user_agent(self.user_agent.clone())
    }
}

impl KegConfig {
    const ENV_PREFIX: &'static str = "KEG_";

    /// `$HOME/.config/keg/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".config").join("keg").join("config.toml"))
    }

    /// Load configuration. An explicit `path` must exist; the default file is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.is_file() => bail!("config file not found: {}", path.display()),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };
        Self::figment(file.as_deref())
            .extract()
            .with_context(|| match &file {
                Some(path) => format!("invalid configuration (file {})", path.display()),
                None => "invalid configuration".to_string(),
            })
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(KegConfig::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
    }
}
