//! Placing verified binaries on disk, and the pipeline that gets them there.
//!
//! [`install`] writes one binary atomically with executable permissions.
//! [`Pipeline`] drives a descriptor through fetch, verify, extract and
//! install, stopping at the first failing stage.

mod error;
mod install;
mod pipeline;

pub use error::{InstallError, PipelineError, Result};
pub use install::{InstalledBinary, install};
pub use pipeline::{InstallReport, Pipeline, Stage};
