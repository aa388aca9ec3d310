use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlatCatError {
    #[error("Directory '{path}' does not exist or is not a directory")]
    InvalidRoot { path: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot write output file {}: {source}", .path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for FlatCatError {
    fn user_message(&self) -> String {
        match self {
            FlatCatError::InvalidRoot { path } => {
                format!("Error: directory '{}' does not exist.", path)
            }
            FlatCatError::OutputFile { path, source } => {
                format!("Failed to write output file {}: {}", path.display(), source)
            }
            FlatCatError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            FlatCatError::InvalidRoot { .. } => Some(
                "Pass an existing directory as the first argument, followed by the extensions to collect (e.g., flatcat src rs toml).".to_string()
            ),
            FlatCatError::OutputFile { .. } => Some(
                "Check that the parent directory of --output exists and is writable.".to_string()
            ),
            FlatCatError::Config { .. } => Some(
                "Check your configuration file syntax. Only the [exclusions] and [output] tables are recognized.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for FlatCatError {
    fn from(error: toml::de::Error) -> Self {
        FlatCatError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlatCatError>;
