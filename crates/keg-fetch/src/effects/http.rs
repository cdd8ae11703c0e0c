use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use url::Url;

use crate::error::TransportError;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Response head plus a streaming body.
pub struct HttpResponse {
    pub status:         u16,
    /// `Location` header, for redirects.
    pub location:       Option<String>,
    pub content_length: Option<u64>,
    pub body:           BoxStream<'static, Result<Bytes, TransportError>>,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("location", &self.location)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations issue exactly one GET and must not follow redirects
/// themselves; [`Fetcher`](crate::Fetcher) does that so it can bound them.
pub trait HttpClient: Send + Sync {
    fn get(
        &self,
        url: &Url,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use futures_util::StreamExt;
    use reqwest::header::{CONTENT_LENGTH, LOCATION};
    use reqwest::redirect::Policy;

    use super::*;
    use crate::data::FetchOptions;
    use crate::error::FetchError;

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone, Debug)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Build a client with timeouts and user agent taken from `options`.
        /// Redirects are disabled at this layer.
        pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
            let client = reqwest::Client::builder()
                .redirect(Policy::none())
                .connect_timeout(options.connect_timeout)
                .read_timeout(options.read_timeout)
                .user_agent(options.user_agent.clone())
                .build()
                .map_err(|e| FetchError::Client {
                    url:    String::new(),
                    reason: e.to_string(),
                })?;
            Ok(Self { client })
        }
    }

    fn transport_error(e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() || e.is_body() || e.is_request() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }

    impl HttpClient for ReqwestClient {
        async fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<HttpResponse, TransportError> {
            let mut request = self.client.get(url.clone());
            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await.map_err(transport_error)?;
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let content_length = response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());

            Ok(HttpResponse {
                status: response.status().as_u16(),
                location,
                content_length,
                body: Box::pin(response.bytes_stream().map(|chunk| chunk.map_err(transport_error))),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
