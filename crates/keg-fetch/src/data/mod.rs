//! Immutable configuration and progress types.

mod options;
mod progress;

pub use options::{FetchOptions, ProgressCallback};
pub use progress::{FetchPhase, Progress};
