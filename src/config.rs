use crate::error::{CodeDocxError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions exported when neither `--ext` nor a config file narrows the set.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "go", "js", "ts", "java", "c", "cpp", "h", "hpp", "py", "sh", "bash", "yaml", "yml", "html",
    "xml", "css", "sql", "json", "md", "txt",
];

pub const DEFAULT_OUTPUT: &str = "code_export.docx";
pub const DEFAULT_TITLE: &str = "Code Export";
pub const DEFAULT_FONT_FAMILY: &str = "Courier New";
pub const DEFAULT_FONT_SIZE: u32 = 10;

/// Word stores run sizes in half-points as a 16-bit value.
const MAX_FONT_SIZE: u32 = 1638;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub filters: FilterConfig,
    pub document: DocumentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub extensions: Vec<String>,
    pub exclude: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub output: PathBuf,
    pub title: Option<String>,
    pub show_filename: bool,
    pub strip_comments: bool,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: Some(DEFAULT_TITLE.to_string()),
            show_filename: false,
            strip_comments: false,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CodeDocxError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CodeDocxError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| CodeDocxError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;
        config.filters.extensions = normalize_extensions(&config.filters.extensions);

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["codedocx.toml", ".codedocx.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref extensions) = cli_args.extensions {
            self.filters.extensions = normalize_extensions(extensions);
        }

        if let Some(ref exclude) = cli_args.exclude {
            self.filters.exclude.extend(exclude.iter().cloned());
        }

        if let Some(ref output) = cli_args.output {
            self.document.output = output.clone();
        }

        if cli_args.no_title {
            self.document.title = None;
        } else if let Some(ref title) = cli_args.title {
            self.document.title = Some(title.clone());
        }

        if cli_args.show_filename {
            self.document.show_filename = true;
        }

        if cli_args.strip_comments {
            self.document.strip_comments = true;
        }

        if let Some(ref font_family) = cli_args.font_family {
            self.document.font_family = font_family.clone();
        }

        if let Some(font_size) = cli_args.font_size {
            self.document.font_size = font_size;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.filters.extensions.is_empty() {
            return Err(CodeDocxError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if self.document.font_size == 0 || self.document.font_size > MAX_FONT_SIZE {
            return Err(CodeDocxError::Config {
                message: format!(
                    "Font size must be between 1 and {} points, got {}",
                    MAX_FONT_SIZE, self.document.font_size
                ),
            });
        }

        if self.document.font_family.trim().is_empty() {
            return Err(CodeDocxError::Config {
                message: "Font family must not be empty".to_string(),
            });
        }

        if self.document.output.as_os_str().is_empty() {
            return Err(CodeDocxError::Config {
                message: "Output path must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

/// Lowercases extensions and tolerates a leading dot (`.Go` becomes `go`).
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
        if !ext.is_empty() && !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }
    normalized
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<PathBuf>>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub no_title: bool,
    pub show_filename: bool,
    pub strip_comments: bool,
    pub font_family: Option<String>,
    pub font_size: Option<u32>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions(mut self, extensions: Option<Vec<String>>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<PathBuf>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_title(mut self, title: Option<String>, no_title: bool) -> Self {
        self.title = title;
        self.no_title = no_title;
        self
    }

    pub fn with_show_filename(mut self, show: bool) -> Self {
        self.show_filename = show;
        self
    }

    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }

    pub fn with_font(mut self, family: Option<String>, size: Option<u32>) -> Self {
        self.font_family = family;
        self.font_size = size;
        self
    }
}
