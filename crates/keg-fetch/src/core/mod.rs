//! Pure decisions used by the fetcher.

mod retry;
mod validation;

pub use retry::retry_delay;
pub use validation::{is_redirect, is_success};
