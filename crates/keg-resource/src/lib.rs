//! Artifact descriptors for keg.
//!
//! An [`ArtifactDescriptor`] is the immutable record every install stage reads:
//! name, version, resolved source URL, pinned digest, archive layout and install
//! path. [`FormulaRecord`] is its plain-data form, loaded from TOML.

pub use self::descriptor::{ArtifactDescriptor, DescriptorBuilder};
pub use self::error::{DescriptorError, Result};
pub use self::formula::FormulaRecord;
pub use self::layout::{ArchiveLayout, ParseLayoutError};
pub use self::template::expand_url_template;

mod descriptor;
mod error;
mod formula;
mod layout;
mod template;
