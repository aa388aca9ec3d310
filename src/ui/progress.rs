use crate::concat::ConcatProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress bars are drawn on stderr and only redrawn on updates; no ticker thread is started.
pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Concatenating files...");
        pb
    }
}

pub fn update_file_progress(pb: &ProgressBar, progress: &ConcatProgress) {
    pb.set_position(progress.files_processed as u64);
    if let Some(ref current) = progress.current_file {
        pb.set_message(truncate_path(current, 40));
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    pb.finish_and_clear();
    if !pb.is_hidden() {
        eprintln!("{} ({})", message, format_duration(duration));
    }
}

/// Keeps the tail of long paths so the file name stays visible.
fn truncate_path(path: &str, max_chars: usize) -> String {
    let count = path.chars().count();
    if count <= max_chars {
        return path.to_string();
    }

    let tail: String = path.chars().skip(count - (max_chars - 3)).collect();
    format!("...{}", tail)
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
