//! HTTP artifact fetching with bounded retries.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - `data` - Immutable configuration and progress types
//! - `core` - Pure decisions (backoff schedule, status classification)
//! - `effects` - Network I/O behind the [`HttpClient`] trait
//!
//! Bytes are held in memory only and handed back to the caller; nothing is
//! persisted by this crate.

mod core;
mod data;
mod effects;
mod error;

pub use self::core::{is_redirect, is_success, retry_delay};
pub use data::{FetchOptions, FetchPhase, Progress, ProgressCallback};
#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
pub use effects::{BoxStream, Fetcher, HttpClient, HttpResponse};
pub use error::{FetchError, Result, TransportError};
pub use tokio_util::sync::CancellationToken;
