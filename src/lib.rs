pub mod cli;
pub mod concat;
pub mod config;
pub mod error;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, ConcatOptions, Config, Exclusions, DEFAULT_OUTPUT};
pub use error::{FlatCatError, Result, UserFriendlyError};

// Core functionality re-exports
pub use concat::{ConcatProgress, ConcatReport, Concatenator};
pub use scanner::{FileFilter, MatchRecord, TreeScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use console::Term;
use tracing::info;

/// Concatenates every file selected by `options` into `options.output` and
/// returns the number of matched files, including those that could not be read.
pub fn run(options: &ConcatOptions) -> Result<usize> {
    let (matches, _) = concatenate(options, None)?;
    Ok(matches.len())
}

/// Traverses, filters and sorts the matches for `options`. Nothing is written.
pub fn collect_matches(options: &ConcatOptions) -> Result<Vec<MatchRecord>> {
    let scanner = TreeScanner::new(FileFilter::from_options(options));
    scanner.scan_directory(&options.root)
}

/// Full pass: the tree is scanned before the output is opened, so an output
/// file inside the root is only picked up if it already existed.
pub fn concatenate(
    options: &ConcatOptions,
    progress_callback: Option<&dyn Fn(&ConcatProgress)>,
) -> Result<(Vec<MatchRecord>, ConcatProgress)> {
    let matches = collect_matches(options)?;

    let mut concatenator = Concatenator::create(&options.output)?;
    let progress = concatenator.write_all(&matches, progress_callback)?;

    info!(
        "Concatenated {} files into {} ({} bytes, {} read errors)",
        progress.files_processed,
        options.output.display(),
        progress.bytes_written,
        progress.errors.len()
    );

    Ok((matches, progress))
}

/// Command-line driver: runs a concatenation with progress display and
/// reporting in the selected output mode.
pub struct FlatCat {
    options: ConcatOptions,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl FlatCat {
    pub fn new(options: ConcatOptions, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let show_progress =
            output_mode == OutputMode::Human && !quiet && Term::stderr().is_term();
        let progress_manager = ProgressManager::new(show_progress);

        Self {
            options,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let options = cli_args.to_options()?;
        Ok(Self::new(
            options,
            cli_args.output_format.into(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    pub fn execute(&self) -> Result<ConcatReport> {
        let file_progress = self.progress_manager.create_file_progress(0);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ConcatProgress| {
                pb.set_length(progress.total_files as u64);
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let result = concatenate(&self.options, Some(&progress_callback));
        let (matches, progress) = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                file_progress.finish_and_clear();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Wrote {} files", progress.files_processed),
            progress.elapsed(),
        );

        let statistics = TreeScanner::new(FileFilter::from_options(&self.options))
            .get_statistics(&matches);
        self.output_formatter.info(statistics.display_summary().trim_end());

        let files = matches.into_iter().map(|m| m.relative_path).collect();
        Ok(ConcatReport::new(&self.options, files, &progress))
    }

    pub fn dry_run(&self) -> Result<ConcatReport> {
        let matches = collect_matches(&self.options)?;
        let files = matches.into_iter().map(|m| m.relative_path).collect();
        Ok(ConcatReport::dry_run(&self.options, files))
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &FlatCatError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_tree(root: &Path) {
        fs::create_dir_all(root.join("src").join("nested")).unwrap();
        fs::create_dir_all(root.join("target").join("debug")).unwrap();
        fs::write(root.join("README.md"), "# Readme\n").unwrap();
        fs::write(root.join("src").join("lib.rs"), "pub mod nested;\n").unwrap();
        fs::write(root.join("src").join("nested").join("mod.rs"), "fn f() {}").unwrap();
        fs::write(root.join("target").join("debug").join("build.rs"), "// generated\n").unwrap();
    }

    #[test]
    fn test_run_counts_matches() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir(&root).unwrap();
        create_tree(&root);
        let output = temp_dir.path().join("out.txt");

        let options = ConcatOptions::new(&root, ["rs"], &output)
            .with_exclusions(Exclusions::new().with_dirs(["target"]));
        let count = run(&options).unwrap();

        assert_eq!(count, 2);
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("pub mod nested;\n"));
        assert!(content.contains("fn f() {}\n\n"));
        assert!(!content.contains("generated"));
    }

    #[test]
    fn test_run_invalid_root_produces_no_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.txt");
        let options = ConcatOptions::new(temp_dir.path().join("missing"), ["rs"], &output);

        let result = run(&options);
        assert!(matches!(result, Err(FlatCatError::InvalidRoot { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir(&root).unwrap();
        create_tree(&root);
        let first = temp_dir.path().join("first.txt");
        let second = temp_dir.path().join("second.txt");

        run(&ConcatOptions::new(&root, ["rs", "md"], &first)).unwrap();
        run(&ConcatOptions::new(&root, ["rs", "md"], &second)).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_empty_extensions_create_empty_output() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir(&root).unwrap();
        create_tree(&root);
        let output = temp_dir.path().join("out.txt");

        let count = run(&ConcatOptions::new(&root, Vec::<String>::new(), &output)).unwrap();

        assert_eq!(count, 0);
        assert!(output.exists());
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[test]
    fn test_output_created_inside_root_is_not_listed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "a\n").unwrap();
        let output = root.join("all.txt");

        let count = run(&ConcatOptions::new(root, ["txt"], &output)).unwrap();
        assert_eq!(count, 1);
        assert!(!fs::read_to_string(&output).unwrap().contains("# all.txt"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir(&root).unwrap();
        create_tree(&root);
        let output = temp_dir.path().join("out.txt");

        let app = FlatCat::new(
            ConcatOptions::new(&root, ["md"], &output),
            OutputMode::Plain,
            0,
            true,
        );
        let report = app.dry_run().unwrap();

        assert!(report.dry_run);
        assert_eq!(report.files, vec!["README.md"]);
        assert!(!output.exists());
    }

    #[test]
    fn test_execute_builds_report() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir(&root).unwrap();
        create_tree(&root);
        fs::write(root.join("broken.md"), [0xc3, 0x28]).unwrap();
        let output = temp_dir.path().join("out.txt");

        let app = FlatCat::new(
            ConcatOptions::new(&root, ["md"], &output),
            OutputMode::Plain,
            0,
            true,
        );
        let report = app.execute().unwrap();

        assert_eq!(report.files, vec!["README.md", "broken.md"]);
        assert_eq!(report.files_concatenated, 2);
        assert_eq!(report.read_errors.len(), 1);
        assert_eq!(report.read_errors[0].path, "broken.md");
        assert_eq!(
            report.bytes_written,
            fs::metadata(&output).unwrap().len()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_reported_inline_and_counted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "a\n").unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("nonexistent"), root.join("dangling.txt"))
            .unwrap();
        let output = temp_dir.path().join("out.txt");

        let count = run(&ConcatOptions::new(&root, ["txt"], &output)).unwrap();

        assert_eq!(count, 2);
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("# dangling.txt\n#---------------------------------------\nError reading file: "));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
