pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DocumentConfig, FilterConfig};
pub use error::{CodeDocxError, Result, UserFriendlyError};

// Core functionality re-exports
pub use export::{
    strip_comments, Block, CodeFont, CommentStyle, DocumentAssembler, DocxDocument,
    ExportProgress, ExportReport, SettingsSnapshot, SourceFile,
};
pub use scanner::{
    normalize_path, normalize_paths, CollectedFiles, FileCollector, FilterDecision,
    InclusionFilter,
};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Files chosen for export, in final order, plus what the walk ran into.
#[derive(Debug, Clone, Default)]
pub struct ExportPlan {
    pub candidate_count: usize,
    pub files: Vec<PathBuf>,
    pub walk_errors: Vec<String>,
}

/// Main library interface: collect, filter, assemble and save.
pub struct CodeDocx {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl CodeDocx {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Ok(Self::new(
            config,
            cli_args.output_mode(),
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Collects candidates under `include_paths` and keeps those that pass the filter.
    pub fn plan<P: AsRef<Path>>(&self, include_paths: &[P]) -> Result<ExportPlan> {
        if include_paths.is_empty() {
            return Err(CodeDocxError::NoIncludePaths);
        }

        self.output_formatter.start_operation("Collecting files");

        let collected = FileCollector::new().collect(include_paths);
        for error in &collected.errors {
            self.output_formatter.warning(error);
        }
        self.output_formatter
            .info(&format!("Found {} candidate files", collected.len()));

        let filter = InclusionFilter::new(&self.config.filters);
        let mut files = filter.select(&collected.files);
        // Plain string order: `config.go` sorts before `config/load.go`
        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        self.output_formatter
            .info(&format!("Selected {} files for export", files.len()));
        for file in &files {
            self.output_formatter.debug(&file.display().to_string());
        }

        if files.is_empty() {
            self.output_formatter.warning(&format!(
                "No files selected for export with extensions: {}",
                filter.get_extensions().join(", ")
            ));
        }

        Ok(ExportPlan {
            candidate_count: collected.len(),
            files,
            walk_errors: collected.errors,
        })
    }

    /// Prints the plan and the active settings without writing anything.
    pub fn dry_run<P: AsRef<Path>>(&self, include_paths: &[P]) -> Result<ExportPlan> {
        let plan = self.plan(include_paths)?;
        self.output_formatter
            .print_dry_run(&plan.files, plan.candidate_count, &self.config);
        Ok(plan)
    }

    /// Runs the whole export. Only an unusable output path or a failed save is fatal.
    pub fn export<P: AsRef<Path>>(&self, include_paths: &[P]) -> Result<ExportReport> {
        let output_path = self.config.document.output.clone();
        if output_path.is_dir() {
            return Err(CodeDocxError::InvalidPath {
                path: format!("{} is a directory", output_path.display()),
            });
        }

        let plan = self.plan(include_paths)?;

        let mut document = DocxDocument::new(CodeFont::new(
            self.config.document.font_family.clone(),
            self.config.document.font_size,
        ));
        if let Some(ref title) = self.config.document.title {
            document.add_heading(title.clone(), 1);
        }

        let progress = self.assemble(&mut document, &plan.files);

        self.output_formatter.start_operation("Writing document");
        let document_bytes = document.save(&output_path)?;
        self.output_formatter.success(&format!(
            "Wrote {} files to {}",
            document.code_block_count(),
            output_path.display()
        ));

        let report = ExportReport::new(
            &output_path,
            plan.candidate_count,
            &plan.files,
            &progress,
            document_bytes,
            SettingsSnapshot::from(&self.config),
        );
        self.output_formatter.print_export_report(&report);

        Ok(report)
    }

    fn assemble(&self, document: &mut DocxDocument, files: &[PathBuf]) -> ExportProgress {
        self.output_formatter.start_operation("Assembling document");

        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let warned = Cell::new(0usize);
        let progress_callback = |progress: &ExportProgress| {
            ui::progress::update_file_progress(&file_progress, progress);

            for error in progress.errors.iter().skip(warned.get()) {
                self.progress_manager
                    .suspend(|| self.output_formatter.warning(error));
            }
            warned.set(progress.errors.len());
        };

        let assembler = DocumentAssembler::from_config(&self.config.document);
        let progress = assembler.assemble(document, files, Some(&progress_callback));

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Added {} files", progress.files_processed),
            progress.elapsed(),
        );

        progress
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &CodeDocxError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
