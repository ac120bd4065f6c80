use std::path::{Component, Path, PathBuf};

/// Returns the absolute form of `path` with `.` and `..` folded away.
///
/// Purely lexical: the path does not have to exist and symlinks are not
/// resolved, so two spellings of the same location compare equal as strings.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root, matching `/..` == `/`
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}

pub fn normalize_paths<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    paths.iter().map(normalize_path).collect()
}
