use crate::concat::ConcatProgress;
use crate::config::{ConcatOptions, Exclusions};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ConcatReport {
    pub root: String,
    pub output: String,
    pub extensions: Vec<String>,
    pub exclusions: Exclusions,
    pub files_concatenated: usize,
    pub bytes_written: u64,
    pub files: Vec<String>,
    pub read_errors: Vec<ReadErrorInfo>,
    pub dry_run: bool,
    pub duration: Duration,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadErrorInfo {
    pub path: String,
    pub message: String,
}

impl ConcatReport {
    pub fn new(options: &ConcatOptions, files: Vec<String>, progress: &ConcatProgress) -> Self {
        Self {
            root: options.root.display().to_string(),
            output: options.output.display().to_string(),
            extensions: options.extensions.clone(),
            exclusions: options.exclusions.clone(),
            files_concatenated: files.len(),
            bytes_written: progress.bytes_written,
            files,
            read_errors: progress
                .errors
                .iter()
                .map(|failure| ReadErrorInfo {
                    path: failure.relative_path.clone(),
                    message: failure.message.clone(),
                })
                .collect(),
            dry_run: false,
            duration: progress.elapsed(),
            generated_at: Utc::now(),
        }
    }

    /// Report for a run that only listed matches.
    pub fn dry_run(options: &ConcatOptions, files: Vec<String>) -> Self {
        let mut report = Self::new(options, files, &ConcatProgress::new(0));
        report.dry_run = true;
        report
    }

    pub fn has_read_errors(&self) -> bool {
        !self.read_errors.is_empty()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} files concatenated into '{}'",
            self.files_concatenated, self.output
        )
    }
}
