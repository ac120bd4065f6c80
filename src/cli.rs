use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codedocx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export source code files into a single Word document")]
#[command(
    long_about = "CodeDocx collects source files from the given paths, filters them by \
                  extension and exclusion prefix, optionally strips comments, and writes \
                  everything into one .docx file in a fixed-width font."
)]
#[command(after_help = "EXAMPLES:\n  \
    codedocx --include src\n  \
    codedocx --include src tests --ext rs toml --output code.docx\n  \
    codedocx --include . --exclude ./target ./vendor --show-filename --no-comments\n  \
    codedocx --include src --config my-config.toml --dry-run")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Files or directories to export
    #[arg(
        long,
        num_args = 1..,
        required_unless_present = "generate_config",
        value_name = "PATH"
    )]
    pub include: Vec<PathBuf>,

    /// Path prefixes to leave out
    #[arg(long, num_args = 0.., value_name = "PATH")]
    pub exclude: Vec<PathBuf>,

    /// File extensions to export (e.g., go py .js)
    #[arg(long = "ext", num_args = 1.., value_name = "EXT")]
    pub extensions: Option<Vec<String>>,

    /// Output document path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Add a heading with the file path before each file
    #[arg(long)]
    pub show_filename: bool,

    /// Strip comments from recognized languages
    #[arg(long = "no-comments")]
    pub no_comments: bool,

    /// Document title
    #[arg(long, conflicts_with = "no_title")]
    pub title: Option<String>,

    /// Leave the title heading out
    #[arg(long)]
    pub no_title: bool,

    /// Font family for code blocks
    #[arg(long = "font", value_name = "FAMILY")]
    pub font_family: Option<String>,

    /// Font size for code blocks, in points
    #[arg(long, value_name = "PT")]
    pub font_size: Option<u32>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be exported without writing)
    #[arg(long, help = "Show which files would be exported without writing the document")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<&OutputFormat> for OutputMode {
    fn from(format: &OutputFormat) -> Self {
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

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let exclude = if self.exclude.is_empty() {
            None
        } else {
            Some(self.exclude.clone())
        };

        CliOverrides::new()
            .with_extensions(self.extensions.clone())
            .with_exclude(exclude)
            .with_output(self.output.clone())
            .with_title(self.title.clone(), self.no_title)
            .with_show_filename(self.show_filename)
            .with_strip_comments(self.no_comments)
            .with_font(self.font_family.clone(), self.font_size)
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from(&self.output_format)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
