//! Filesystem primitives for placing installed files.
//!
//! Every write goes through a uniquely named temporary file next to the
//! destination followed by a rename, so an interrupted or concurrent install
//! never exposes a partially written file.

mod atomic;
mod error;
mod permissions;

pub use atomic::{AtomicWriteOptions, atomic_write};
pub use error::{Error, Result, from_io};
pub use permissions::PermissionMode;
