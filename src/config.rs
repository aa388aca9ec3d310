use crate::error::{FlatCatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "concatenado.txt";

/// The three independent exclusion filters. Every list defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Exclusions {
    /// Substrings matched against directory names.
    pub dirs: Vec<String>,
    /// Substrings matched against file names.
    pub files: Vec<String>,
    /// Suffixes matched against file names.
    pub extensions: Vec<String>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty() && self.extensions.is_empty()
    }
}

/// Everything a single concatenation run needs. Built once, never mutated by the run.
#[derive(Debug, Clone)]
pub struct ConcatOptions {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub output: PathBuf,
    pub exclusions: Exclusions,
}

impl ConcatOptions {
    pub fn new<R, O, I, S>(root: R, extensions: I, output: O) -> Self
    where
        R: Into<PathBuf>,
        O: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            output: output.into(),
            exclusions: Exclusions::default(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub exclusions: Exclusions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(FlatCatError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| FlatCatError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| FlatCatError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    /// Only an explicitly named file is read; there is no implicit lookup.
    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        self.exclusions.dirs.extend(cli_args.exclude_dirs.iter().cloned());
        self.exclusions.files.extend(cli_args.exclude_files.iter().cloned());
        self.exclusions
            .extensions
            .extend(cli_args.exclude_exts.iter().cloned());

        if let Some(ref output) = cli_args.output {
            self.output.path = Some(output.clone());
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn into_options<R, I, S>(self, root: R, extensions: I) -> ConcatOptions
    where
        R: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let output = self.output_path();
        ConcatOptions::new(root, extensions, output).with_exclusions(self.exclusions)
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
    pub exclude_exts: Vec<String>,
    pub output: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    pub fn with_exclude_files(mut self, files: Vec<String>) -> Self {
        self.exclude_files = files;
        self
    }

    pub fn with_exclude_exts(mut self, exts: Vec<String>) -> Self {
        self.exclude_exts = exts;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }
}

/// Prepends a dot to extension tokens that lack one. `txt` and `.txt` are equivalent.
pub fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{}", extension)
    }
}

pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| normalize_extension(ext.as_ref()))
        .collect()
}
