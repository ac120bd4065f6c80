use crate::scanner::paths::normalize_path;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Everything reachable from the include arguments, before any filtering.
#[derive(Debug, Default)]
pub struct CollectedFiles {
    pub files: BTreeSet<PathBuf>,
    pub errors: Vec<String>,
}

impl CollectedFiles {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct FileCollector;

impl FileCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn collect<P: AsRef<Path>>(&self, include_paths: &[P]) -> CollectedFiles {
        let mut collected = CollectedFiles::default();

        for include in include_paths {
            let root = normalize_path(include);

            if root.is_file() {
                collected.files.insert(root);
            } else if root.is_dir() {
                self.walk_directory(&root, &mut collected);
            } else {
                tracing::debug!(path = %root.display(), "include path does not exist, skipping");
            }
        }

        collected
    }

    fn walk_directory(&self, root: &Path, collected: &mut CollectedFiles) {
        let walker = WalkDir::new(root).follow_links(false);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        collected.errors.push(format!("Permission denied: {}", err));
                    } else {
                        collected.errors.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            if is_regular_file(&entry) {
                tracing::trace!(path = %entry.path().display(), "candidate");
                collected.files.insert(entry.into_path());
            }
        }
    }
}

// Symlinked files count as files; symlinked directories are never descended.
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
