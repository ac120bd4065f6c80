use crate::config::Config;
use crate::export::assembler::ExportProgress;
use crate::export::comments::language_tag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub output_path: String,
    pub candidate_files: usize,
    pub selected_files: usize,
    pub exported_files: Vec<String>,
    pub skipped_files: Vec<String>,
    pub files_by_extension: BTreeMap<String, usize>,
    pub bytes_read: u64,
    pub document_bytes: u64,
    pub comment_lines_removed: usize,
    pub duration: Duration,
    pub exported_at: DateTime<Utc>,
    pub errors: Vec<String>,
    pub settings: SettingsSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub title: Option<String>,
    pub show_filename: bool,
    pub strip_comments: bool,
    pub font_family: String,
    pub font_size: u32,
}

impl From<&Config> for SettingsSnapshot {
    fn from(config: &Config) -> Self {
        Self {
            extensions: config.filters.extensions.clone(),
            exclude: config
                .filters
                .exclude
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            title: config.document.title.clone(),
            show_filename: config.document.show_filename,
            strip_comments: config.document.strip_comments,
            font_family: config.document.font_family.clone(),
            font_size: config.document.font_size,
        }
    }
}

impl ExportReport {
    pub fn new(
        output_path: &Path,
        candidate_files: usize,
        selected: &[PathBuf],
        progress: &ExportProgress,
        document_bytes: u64,
        settings: SettingsSnapshot,
    ) -> Self {
        let exported: Vec<&PathBuf> = selected
            .iter()
            .filter(|p| !progress.skipped.contains(*p))
            .collect();

        Self {
            output_path: output_path.display().to_string(),
            candidate_files,
            selected_files: selected.len(),
            exported_files: exported.iter().map(|p| p.display().to_string()).collect(),
            skipped_files: progress
                .skipped
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            files_by_extension: count_by_extension(exported.iter().map(|p| p.as_path())),
            bytes_read: progress.bytes_read,
            document_bytes,
            comment_lines_removed: progress.comment_lines_removed,
            duration: progress.elapsed(),
            exported_at: Utc::now(),
            errors: progress.errors.clone(),
            settings,
        }
    }
}

pub fn count_by_extension<'a, I>(paths: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut counts = BTreeMap::new();
    for path in paths {
        let tag = language_tag(path);
        let key = if tag.is_empty() {
            "no_extension".to_string()
        } else {
            tag
        };
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_separates_exported_and_skipped() {
        let selected = vec![
            PathBuf::from("/p/a.go"),
            PathBuf::from("/p/b.go"),
            PathBuf::from("/p/c.py"),
        ];
        let mut progress = ExportProgress::new(3);
        progress.update_file("/p/a.go".to_string(), 10, 0);
        progress.update_file("/p/c.py".to_string(), 20, 2);
        progress.add_skipped(Path::new("/p/b.go"), "Failed to read /p/b.go");

        let report = ExportReport::new(
            Path::new("out.docx"),
            5,
            &selected,
            &progress,
            1234,
            SettingsSnapshot::from(&Config::default()),
        );

        assert_eq!(report.candidate_files, 5);
        assert_eq!(report.selected_files, 3);
        assert_eq!(report.exported_files.len(), 2);
        assert_eq!(report.skipped_files, vec![PathBuf::from("/p/b.go").display().to_string()]);
        assert_eq!(report.files_by_extension.get("go"), Some(&1));
        assert_eq!(report.files_by_extension.get("py"), Some(&1));
        assert_eq!(report.bytes_read, 30);
        assert_eq!(report.comment_lines_removed, 2);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let progress = ExportProgress::new(0);
        let report = ExportReport::new(
            Path::new("out.docx"),
            0,
            &[],
            &progress,
            0,
            SettingsSnapshot::from(&Config::default()),
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"output_path\":\"out.docx\""));
        assert!(json.contains("\"font_family\":\"Courier New\""));
    }

    #[test]
    fn test_count_by_extension() {
        let paths = [Path::new("a.GO"), Path::new("b.go"), Path::new("Makefile")];
        let counts = count_by_extension(paths);
        assert_eq!(counts.get("go"), Some(&2));
        assert_eq!(counts.get("no_extension"), Some(&1));
    }
}
