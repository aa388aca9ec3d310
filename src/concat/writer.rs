use crate::error::{FlatCatError, Result};
use crate::scanner::MatchRecord;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const SEPARATOR: &str = "#---------------------------------------";

#[derive(Debug, Clone)]
pub struct ReadFailure {
    pub relative_path: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ConcatProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<ReadFailure>,
}

impl ConcatProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, relative_path: &str, bytes: u64) {
        self.files_processed += 1;
        self.bytes_written += bytes;
        self.current_file = Some(relative_path.to_string());
    }

    pub fn add_error(&mut self, relative_path: &str, message: String) {
        self.errors.push(ReadFailure {
            relative_path: relative_path.to_string(),
            message,
        });
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Writes banner + content blocks for each match into a single stream.
pub struct Concatenator<W: Write> {
    writer: W,
}

impl Concatenator<BufWriter<fs::File>> {
    /// Creates or truncates `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = fs::File::create(path).map_err(|source| FlatCatError::OutputFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Concatenator<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes every record in the given order. Read failures are recorded inline
    /// and in the returned progress; only write failures abort.
    pub fn write_all(
        &mut self,
        records: &[MatchRecord],
        progress_callback: Option<&dyn Fn(&ConcatProgress)>,
    ) -> Result<ConcatProgress> {
        let mut progress = ConcatProgress::new(records.len());

        for record in records {
            let bytes = self.write_entry(record, &mut progress)?;
            progress.update_file(&record.relative_path, bytes);

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        self.writer.flush()?;
        Ok(progress)
    }

    fn write_entry(&mut self, record: &MatchRecord, progress: &mut ConcatProgress) -> Result<u64> {
        let banner = format!(
            "{sep}\n# {path}\n{sep}\n",
            sep = SEPARATOR,
            path = record.relative_path
        );
        self.writer.write_all(banner.as_bytes())?;
        let mut written = banner.len() as u64;

        match fs::read_to_string(&record.source_path) {
            Ok(content) => {
                self.writer.write_all(content.as_bytes())?;
                written += content.len() as u64;

                if !content.is_empty() && !content.ends_with('\n') {
                    self.writer.write_all(b"\n")?;
                    written += 1;
                }
                self.writer.write_all(b"\n")?;
                written += 1;
                debug!("Wrote {} ({} bytes)", record.relative_path, content.len());
            }
            Err(e) => {
                warn!("Failed to read {}: {}", record.relative_path, e);
                let line = format!("Error reading file: {}\n\n", e);
                self.writer.write_all(line.as_bytes())?;
                written += line.len() as u64;
                progress.add_error(&record.relative_path, e.to_string());
            }
        }

        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn create_record(dir: &Path, name: &str, content: &[u8]) -> MatchRecord {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        MatchRecord::new(name.to_string(), path)
    }

    fn concatenate(records: &[MatchRecord]) -> (String, ConcatProgress) {
        let mut concatenator = Concatenator::new(Vec::new());
        let progress = concatenator.write_all(records, None).unwrap();
        (String::from_utf8(concatenator.into_inner()).unwrap(), progress)
    }

    #[test]
    fn test_banner_and_content() {
        let temp_dir = TempDir::new().unwrap();
        let record = create_record(temp_dir.path(), "a.txt", b"hello\n");

        let (output, progress) = concatenate(&[record]);

        assert_eq!(
            output,
            "#---------------------------------------\n\
             # a.txt\n\
             #---------------------------------------\n\
             hello\n\
             \n"
        );
        assert_eq!(progress.files_processed, 1);
        assert_eq!(progress.bytes_written, output.len() as u64);
        assert!(progress.errors.is_empty());
    }

    #[test]
    fn test_missing_trailing_newline_is_added() {
        let temp_dir = TempDir::new().unwrap();
        let record = create_record(temp_dir.path(), "a.txt", b"no newline");

        let (output, _) = concatenate(&[record]);
        assert!(output.ends_with("---\nno newline\n\n"));
    }

    #[test]
    fn test_empty_file_gets_only_separator_line() {
        let temp_dir = TempDir::new().unwrap();
        let record = create_record(temp_dir.path(), "empty.txt", b"");

        let (output, _) = concatenate(&[record]);
        assert_eq!(
            output,
            format!("{0}\n# empty.txt\n{0}\n\n", SEPARATOR)
        );
    }

    #[test]
    fn test_content_written_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let record = create_record(temp_dir.path(), "crlf.txt", b"one\r\ntwo\r\n");

        let (output, _) = concatenate(&[record]);
        assert!(output.contains("one\r\ntwo\r\n\n"));
    }

    #[test]
    fn test_read_failure_is_inlined_and_run_continues() {
        let temp_dir = TempDir::new().unwrap();
        let bad = create_record(temp_dir.path(), "bad.txt", &[0xff, 0xfe, 0x00, 0x80]);
        let missing = MatchRecord::new("gone.txt".to_string(), temp_dir.path().join("gone.txt"));
        let good = create_record(temp_dir.path(), "good.txt", b"fine\n");

        let (output, progress) = concatenate(&[bad, missing, good]);

        assert!(output.contains("# bad.txt\n"));
        assert!(output.contains("# gone.txt\n"));
        assert_eq!(output.matches("Error reading file: ").count(), 2);
        assert!(output.ends_with("# good.txt\n#---------------------------------------\nfine\n\n"));

        assert_eq!(progress.files_processed, 3);
        assert_eq!(progress.errors.len(), 2);
        assert_eq!(progress.errors[0].relative_path, "bad.txt");
        assert_eq!(progress.errors[1].relative_path, "gone.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_denied_is_inlined() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = create_record(temp_dir.path(), "locked.txt", b"secret\n");
        let open = create_record(temp_dir.path(), "open.txt", b"visible\n");
        fs::set_permissions(&locked.source_path, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root.
        if fs::read(&locked.source_path).is_ok() {
            return;
        }

        let (output, progress) = concatenate(&[locked.clone(), open]);
        fs::set_permissions(&locked.source_path, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(output.contains("# locked.txt\n#---------------------------------------\nError reading file: "));
        assert!(!output.contains("secret"));
        assert!(output.ends_with("visible\n\n"));
        assert_eq!(progress.files_processed, 2);
        assert_eq!(progress.errors.len(), 1);
        assert_eq!(progress.errors[0].relative_path, "locked.txt");
    }

    #[test]
    fn test_error_line_format() {
        let temp_dir = TempDir::new().unwrap();
        let missing = MatchRecord::new("x.txt".to_string(), temp_dir.path().join("x.txt"));

        let (output, progress) = concatenate(&[missing]);

        let expected_line = format!("Error reading file: {}\n\n", progress.errors[0].message);
        assert!(output.ends_with(&expected_line));
    }

    #[test]
    fn test_progress_callback_invoked_per_file() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![
            create_record(temp_dir.path(), "a.txt", b"a"),
            create_record(temp_dir.path(), "b.txt", b"b"),
        ];

        let calls = Cell::new(0);
        let callback = |progress: &ConcatProgress| {
            calls.set(calls.get() + 1);
            assert_eq!(progress.files_processed, calls.get());
        };

        let mut concatenator = Concatenator::new(Vec::new());
        concatenator.write_all(&records, Some(&callback)).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_create_truncates_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("out.txt");
        fs::write(&output_path, "stale content that should vanish").unwrap();

        let mut concatenator = Concatenator::create(&output_path).unwrap();
        concatenator.write_all(&[], None).unwrap();
        drop(concatenator);

        assert_eq!(fs::read_to_string(&output_path).unwrap(), "");
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("nope").join("out.txt");

        let result = Concatenator::create(&output_path);
        assert!(matches!(result, Err(FlatCatError::OutputFile { .. })));
    }

    #[test]
    fn test_progress_percentage() {
        let mut progress = ConcatProgress::new(4);
        assert_eq!(progress.percentage(), 0.0);

        progress.update_file("a.txt", 10);
        assert_eq!(progress.percentage(), 25.0);
        assert_eq!(progress.bytes_written, 10);
        assert_eq!(progress.current_file.as_deref(), Some("a.txt"));
    }
}
