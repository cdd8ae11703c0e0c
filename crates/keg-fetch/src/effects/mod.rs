//! Network I/O behind the [`HttpClient`] seam.

mod fetcher;
mod http;

pub use fetcher::Fetcher;
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use http::{BoxStream, HttpClient, HttpResponse};
