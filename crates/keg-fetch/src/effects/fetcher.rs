use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::core::{is_redirect, is_success, retry_delay};
use crate::data::{FetchOptions, FetchPhase, Progress};
use crate::effects::http::{HttpClient, HttpResponse};
use crate::error::{FetchError, Result, TransportError};

/// Largest buffer reserved up front from a Content-Length header.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Downloads an artifact into memory under a bounded retry policy.
pub struct Fetcher<C: HttpClient> {
    client:  C,
    options: FetchOptions,
}

/// Why a single attempt ended.
enum AttemptError {
    Transport(TransportError),
    Fatal(FetchError),
}

impl From<FetchError> for AttemptError {
    fn from(e: FetchError) -> Self { Self::Fatal(e) }
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, options: FetchOptions) -> Self { Self { client, options } }

    /// Fetch `url` into memory.
    ///
    /// Timeouts and dropped connections are retried up to `max_retries` times
    /// with capped exponential backoff, then surface as
    /// [`FetchError::Unreachable`]. Non-2xx statuses and redirect overflow fail
    /// immediately.
    #[tracing::instrument(level = "debug", skip(self, url, cancel), fields(url = %url))]
    pub async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<Bytes> {
        let mut retries = 0u32;

        loop {
            let attempt = retries + 1;
            self.options.report(Progress {
                phase: FetchPhase::Connecting,
                attempt,
                ..Progress::default()
            });

            let error = match self.attempt(url, attempt, cancel).await {
                Ok(bytes) => {
                    tracing::debug!(attempt, size = bytes.len(), "fetch completed");
                    self.options.report(Progress {
                        phase: FetchPhase::Completed,
                        bytes_downloaded: bytes.len() as u64,
                        total_bytes: Some(bytes.len() as u64),
                        attempt,
                    });
                    return Ok(bytes);
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transport(e)) if !e.is_transient() => {
                    return Err(FetchError::Client {
                        url:    url.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(AttemptError::Transport(e)) => e,
            };

            if retries >= self.options.max_retries {
                tracing::warn!(attempts = attempt, error = %error, "retry budget exhausted");
                return Err(FetchError::Unreachable {
                    url:      url.to_string(),
                    attempts: attempt,
                    reason:   error.to_string(),
                });
            }

            let delay = retry_delay(retries, self.options.retry_backoff, self.options.retry_backoff_cap);
            tracing::warn!(attempt, error = %error, delay_ms = delay.as_millis() as u64, "transient fetch failure, retrying");
            self.options.report(Progress {
                phase: FetchPhase::Retrying,
                attempt,
                ..Progress::default()
            });

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled { url: url.to_string() }),
                _ = sleep(delay) => {}
            }
            retries += 1;
        }
    }

    async fn attempt(
        &self,
        url: &Url,
        attempt: u32,
        cancel: &CancellationToken,
    ) -> std::result::Result<Bytes, AttemptError> {
        let response = self.follow_redirects(url, cancel).await?;
        let total_bytes = response.content_length;
        let mut body = response.body;
        let mut buffer = BytesMut::with_capacity(total_bytes.unwrap_or(0).min(MAX_PREALLOC) as usize);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(FetchError::Cancelled { url: url.to_string() }.into());
                }
                next = timeout(self.options.read_timeout, body.next()) => next,
            };

            let chunk = match next {
                Err(_) => {
                    return Err(AttemptError::Transport(TransportError::Timeout(format!(
                        "no body data for {:?}",
                        self.options.read_timeout
                    ))));
                }
                Ok(None) => break,
                Ok(Some(chunk)) => chunk.map_err(AttemptError::Transport)?,
            };

            buffer.extend_from_slice(&chunk);
            self.options.report(Progress {
                phase: FetchPhase::Downloading,
                bytes_downloaded: buffer.len() as u64,
                total_bytes,
                attempt,
            });
        }

        Ok(buffer.freeze())
    }

    /// Issue the GET, following at most `max_redirects` redirects.
    async fn follow_redirects(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> std::result::Result<HttpResponse, AttemptError> {
        let head_timeout = self.options.connect_timeout + self.options.read_timeout;
        let mut current = url.clone();
        let mut redirects = 0u32;

        loop {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(FetchError::Cancelled { url: url.to_string() }.into());
                }
                r = timeout(head_timeout, self.client.get(&current, &self.options.headers)) => r,
            };

            let response = match response {
                Err(_) => {
                    return Err(AttemptError::Transport(TransportError::Timeout(format!(
                        "no response from {current} within {head_timeout:?}"
                    ))));
                }
                Ok(r) => r.map_err(AttemptError::Transport)?,
            };

            if is_redirect(response.status) {
                if redirects >= self.options.max_redirects {
                    return Err(FetchError::TooManyRedirects {
                        url:   url.to_string(),
                        limit: self.options.max_redirects,
                    }
                    .into());
                }
                let location = response.location.ok_or_else(|| FetchError::BadStatus {
                    url:  current.to_string(),
                    code: response.status,
                })?;
                current = resolve_redirect(&current, &location)?;
                redirects += 1;
                tracing::debug!(to = %current, redirects, "following redirect");
                continue;
            }

            if !is_success(response.status) {
                return Err(FetchError::BadStatus {
                    url:  current.to_string(),
                    code: response.status,
                }
                .into());
            }

            return Ok(response);
        }
    }
}

fn resolve_redirect(base: &Url, location: &str) -> Result<Url> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: location.to_string(),
        reason,
    };
    let next = base.join(location).map_err(|e| invalid(e.to_string()))?;
    match (base.scheme(), next.scheme()) {
        ("https", "http") => Err(invalid("redirect downgrades https to http".into())),
        (_, "http" | "https") => Ok(next),
        (_, other) => Err(invalid(format!("redirect to unsupported scheme '{other}'"))),
    }
}
