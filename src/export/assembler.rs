use crate::config::DocumentConfig;
use crate::error::{CodeDocxError, Result};
use crate::export::comments::{language_tag, strip_with_style, CommentStyle};
use crate::export::docx::DocxDocument;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One source file, read and decoded, ready to be placed in the document.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    pub tag: String,
    pub size: u64,
}

impl SourceFile {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CodeDocxError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            content: decode_lossy(&bytes),
            tag: language_tag(path),
            size: bytes.len() as u64,
        })
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Decodes UTF-8, silently dropping any invalid byte sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        decoded.push_str(chunk.valid());
    }
    decoded
}

#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_read: u64,
    pub comment_lines_removed: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub skipped: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl ExportProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_read: 0,
            comment_lines_removed: 0,
            current_file: None,
            start_time: Instant::now(),
            skipped: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String, bytes: u64, removed_lines: usize) {
        self.files_processed += 1;
        self.bytes_read += bytes;
        self.comment_lines_removed += removed_lines;
        self.current_file = Some(filename);
    }

    pub fn add_skipped<S: Into<String>>(&mut self, path: &Path, error: S) {
        self.skipped.push(path.to_path_buf());
        self.errors.push(error.into());
    }

    pub fn attempted(&self) -> usize {
        self.files_processed + self.skipped.len()
    }


    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        let attempted = self.attempted();
        if attempted == 0 {
            return Duration::from_secs(0);
        }

        let rate = attempted as f64 / self.elapsed().as_secs_f64();
        let remaining_files = self.total_files.saturating_sub(attempted);

        if rate.is_finite() && rate > 0.0 {
            Duration::from_secs_f64(remaining_files as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Turns accepted source files into document blocks, one file at a time.
pub struct DocumentAssembler {
    show_filename: bool,
    strip_comments: bool,
}

impl DocumentAssembler {
    pub fn new() -> Self {
        Self {
            show_filename: false,
            strip_comments: false,
        }
    }

    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new()
            .with_show_filename(config.show_filename)
            .with_strip_comments(config.strip_comments)
    }

    pub fn with_show_filename(mut self, show: bool) -> Self {
        self.show_filename = show;
        self
    }

    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }

    /// Appends every file in order. Unreadable files are recorded in the
    /// returned progress and contribute nothing to the document.
    pub fn assemble(
        &self,
        document: &mut DocxDocument,
        files: &[PathBuf],
        progress_callback: Option<&dyn Fn(&ExportProgress)>,
    ) -> ExportProgress {
        let mut progress = ExportProgress::new(files.len());

        for path in files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            match self.append_file(document, path) {
                Ok((bytes, removed)) => {
                    tracing::debug!(path = %path.display(), bytes, removed, "file exported");
                    progress.update_file(path.display().to_string(), bytes, removed);
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "file skipped");
                    progress.add_skipped(path, e.to_string());
                }
            }
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        progress
    }

    /// Returns the bytes read and the number of comment lines removed.
    pub fn append_file(&self, document: &mut DocxDocument, path: &Path) -> Result<(u64, usize)> {
        let source = SourceFile::read(path)?;

        let (content, removed) = match CommentStyle::for_tag(&source.tag) {
            Some(style) if self.strip_comments => strip_with_style(&source.content, style),
            _ => (source.content.clone(), 0),
        };

        if self.show_filename {
            document.add_heading(source.display_path(), 2);
        }
        document.add_code_block(&content);

        Ok((source.size, removed))
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}
