use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeDocxError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("No include paths were given")]
    NoIncludePaths,

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML generation failed: {message}")]
    Xml { message: String },

    #[error("Document packaging failed: {message}")]
    Archive { message: String },

    #[error("Failed to save document to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodeDocxError {
    pub fn xml<S: Into<String>>(message: S) -> Self {
        CodeDocxError::Xml {
            message: message.into(),
        }
    }

    pub fn archive<S: Into<String>>(message: S) -> Self {
        CodeDocxError::Archive {
            message: message.into(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for CodeDocxError {
    fn user_message(&self) -> String {
        match self {
            CodeDocxError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            CodeDocxError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            CodeDocxError::ReadFile { path, source } => {
                format!("Cannot read {}: {}", path.display(), source)
            }
            CodeDocxError::Save { path, source } => {
                format!("Cannot write document {}: {}", path.display(), source)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            CodeDocxError::Config { .. } => Some(
                "Check your configuration file syntax and the values passed on the command line.".to_string()
            ),
            CodeDocxError::NoIncludePaths => Some(
                "Pass at least one file or directory with --include.".to_string()
            ),
            CodeDocxError::Save { .. } => Some(
                "Make sure the output directory exists and is writable, or pick another path with --output.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for CodeDocxError {
    fn from(error: toml::de::Error) -> Self {
        CodeDocxError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodeDocxError>;

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
