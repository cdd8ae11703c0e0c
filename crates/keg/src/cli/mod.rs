mod app;
pub mod install;
pub mod verify;

pub use app::{App, Commands};
