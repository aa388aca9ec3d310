use crate::config::{CliOverrides, ConcatOptions, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flatcat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concatenate files of a directory tree by extension")]
#[command(
    long_about = "FlatCat walks a directory, selects files whose names end with the requested \
                  extensions, and writes them into a single output file, each preceded by a \
                  banner with its path relative to the root."
)]
#[command(after_help = "EXAMPLES:\n  \
    flatcat src rs toml\n  \
    flatcat . py -o snapshot.txt --exclude-dirs venv __pycache__\n  \
    flatcat web .ts .tsx --exclude-files .spec. --exclude-exts d.ts\n  \
    flatcat . md --config flatcat.toml --dry-run")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory to traverse
    pub root_directory: PathBuf,

    /// File extensions to collect, with or without the leading dot
    #[arg(required = true, num_args = 1..)]
    pub extensions: Vec<String>,

    /// Output file (default: concatenado.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip directories whose name contains any of these substrings
    #[arg(long, num_args = 0..)]
    pub exclude_dirs: Vec<String>,

    /// Skip files whose name contains any of these substrings
    #[arg(long, num_args = 0..)]
    pub exclude_files: Vec<String>,

    /// Skip files whose name ends with any of these extensions
    #[arg(long, num_args = 0..)]
    pub exclude_exts: Vec<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML file with default exclusions")]
    pub config: Option<PathBuf>,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress the summary)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List matching files without writing the output
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;
        config.merge_with_cli_args(&self.create_cli_overrides());
        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_exclude_dirs(self.exclude_dirs.clone())
            .with_exclude_files(self.exclude_files.clone())
            .with_exclude_exts(self.exclude_exts.clone())
            .with_output(self.output.clone())
    }

    pub fn to_options(&self) -> Result<ConcatOptions> {
        let config = self.load_config()?;
        Ok(config.into_options(self.root_directory.clone(), self.extensions.clone()))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default tracing directive for the `-v`/`-q` flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
