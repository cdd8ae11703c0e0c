use std::fmt;

/// Phases of a fetch.
///
/// Connecting → Downloading → Completed, with Retrying in between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Connecting,
    Downloading,
    /// Waiting out the backoff before the next attempt.
    Retrying,
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Retrying => write!(f, "Retrying"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Snapshot handed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub phase:            FetchPhase,
    pub bytes_downloaded: u64,
    /// From Content-Length when the server sent one.
    pub total_bytes:      Option<u64>,
    /// 1-based attempt number.
    pub attempt:          u32,
}
