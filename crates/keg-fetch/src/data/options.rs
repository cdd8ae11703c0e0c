use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::progress::Progress;

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Configuration for fetching one artifact.
///
/// # Examples
///
/// ```
/// use keg_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .max_retries(5)
///     .retry_backoff(Duration::from_millis(200), Duration::from_secs(2))
///     .header("Authorization", "Bearer token");
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Bound on establishing a connection and receiving response headers.
    ///
    /// Default: 10s
    pub connect_timeout: Duration,

    /// Bound on waiting for any single body chunk.
    ///
    /// Default: 30s
    pub read_timeout: Duration,

    /// Retries after the initial attempt, for timeouts and dropped connections
    /// only. HTTP error statuses are never retried.
    ///
    /// Default: 3
    pub max_retries: u32,

    /// Backoff before retry N is `retry_backoff * 2^(N-1)`, at most `retry_backoff_cap`.
    ///
    /// Default: 500ms
    pub retry_backoff: Duration,

    /// Default: 5s
    pub retry_backoff_cap: Duration,

    /// Default: 5
    pub max_redirects: u32,

    pub user_agent: String,

    /// Sent with every request, including retries and redirects.
    pub headers: Arc<[(String, String)]>,

    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("retry_backoff_cap", &self.retry_backoff_cap)
            .field("max_redirects", &self.max_redirects)
            .field("user_agent", &self.user_agent)
            .field("headers", &self.headers)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout:   Duration::from_secs(10),
            read_timeout:      Duration::from_secs(30),
            max_retries:       3,
            retry_backoff:     Duration::from_millis(500),
            retry_backoff_cap: Duration::from_secs(5),
            max_redirects:     5,
            user_agent:        concat!("keg/", env!("CARGO_PKG_VERSION")).to_string(),
            headers:           Arc::new([]),
            on_progress:       None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.retry_backoff = base;
        self.retry_backoff_cap = cap;
        self
    }

    #[must_use]
    pub fn max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = headers.into();
        self
    }

    #[must_use]
    pub fn on_progress(mut self, callback: impl Fn(&Progress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(callback) = &self.on_progress {
            callback(&progress);
        }
    }
}
