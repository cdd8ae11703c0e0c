//! Binary extraction from fetched artifacts.
//!
//! The [`ArchiveLayout`](keg_resource::ArchiveLayout) declared by the
//! descriptor decides where the binary is looked for; nothing is auto-detected.
//! Any member that would escape the archive root fails the whole extraction
//! with [`ExtractError::PathTraversal`].

pub use error::{ExtractError, Result};
pub use extract::extract;
pub use sanitize::{sanitize_entry_path, sanitize_link_target};

mod error;
mod extract;
mod sanitize;
