use indicatif::{ProgressBar, ProgressStyle};
use keg_fetch::{FetchPhase, Progress};

const PB_STYLE: &str =
    "{spinner:.blue} {msg} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

fn style() -> ProgressStyle {
    match ProgressStyle::with_template(PB_STYLE) {
        Ok(style) => style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => ProgressStyle::default_bar(),
    }
}

/// Terminal progress bar fed by the fetch progress callback.
#[derive(Clone)]
pub struct DownloadTracker {
    pb: ProgressBar,
}

impl DownloadTracker {
    pub fn new(name: &str, hidden: bool) -> Self {
        let pb = if hidden { ProgressBar::hidden() } else { ProgressBar::no_length() };
        pb.set_style(style());
        pb.set_message(name.to_string());
        Self { pb }
    }

    pub fn update(&self, progress: &Progress) {
        match progress.phase {
            FetchPhase::Connecting => self.pb.set_position(0),
            FetchPhase::Downloading => {
                if let Some(total) = progress.total_bytes {
                    self.pb.set_length(total);
                }
                self.pb.set_position(progress.bytes_downloaded);
            }
            FetchPhase::Retrying => {
                self.pb.println(format!("attempt {} failed, retrying", progress.attempt));
            }
            FetchPhase::Completed => {
                self.pb.set_length(progress.bytes_downloaded);
                self.pb.set_position(progress.bytes_downloaded);
            }
        }
    }

    pub fn finish(&self) { self.pb.finish_and_clear(); }
}
