use crate::config::{normalize_extensions, FilterConfig};
use crate::scanner::paths::normalize_paths;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Accept,
    Excluded,
    ExtensionMismatch,
}

/// Decides whether a collected path goes into the export.
///
/// Exclusions are raw string prefixes over the normalized path, so an
/// exclusion of `/a/b` also removes `/a/bc/file.go`.
pub struct InclusionFilter {
    extensions: Vec<String>,
    exclude_prefixes: Vec<String>,
}

impl InclusionFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self::from_parts(&config.extensions, &config.exclude)
    }

    pub fn from_parts<S: AsRef<str>, P: AsRef<Path>>(extensions: &[S], exclude: &[P]) -> Self {
        let exclude_prefixes = normalize_paths(exclude)
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        Self {
            extensions: normalize_extensions(extensions),
            exclude_prefixes,
        }
    }

    pub fn decide(&self, path: &Path) -> FilterDecision {
        if self.is_excluded(path) {
            return FilterDecision::Excluded;
        }

        if !self.matches_extension(path) {
            return FilterDecision::ExtensionMismatch;
        }

        FilterDecision::Accept
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude_prefixes
            .iter()
            .any(|prefix| path_str.starts_with(prefix.as_str()))
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        let lowered = path.to_string_lossy().to_lowercase();
        self.extensions.iter().any(|ext| {
            lowered
                .strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.'))
        })
    }

    /// Applies the filter to every candidate, keeping their order.
    pub fn select<'a, I>(&self, candidates: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        candidates
            .into_iter()
            .filter(|path| match self.decide(path) {
                FilterDecision::Accept => true,
                decision => {
                    tracing::trace!(path = %path.display(), ?decision, "rejected");
                    false
                }
            })
            .cloned()
            .collect()
    }

    pub fn get_extensions(&self) -> &[String] {
        &self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_filter(exclude: &[&str]) -> InclusionFilter {
        InclusionFilter::from_parts(&["go", "py", "tar.gz"], exclude)
    }

    #[test]
    fn test_extension_matching() {
        let filter = create_test_filter(&[]);

        assert!(filter.matches_extension(Path::new("/src/main.go")));
        assert!(filter.matches_extension(Path::new("/src/tool.py")));
        assert!(filter.matches_extension(Path::new("/dist/bundle.tar.gz")));

        assert!(!filter.matches_extension(Path::new("/src/main.rs")));
        assert!(!filter.matches_extension(Path::new("/src/mango")));
        assert!(!filter.matches_extension(Path::new("/src/go")));
    }

    #[test]
    fn test_case_insensitive_extensions() {
        let filter = InclusionFilter::from_parts(&["GO"], &[] as &[&str]);

        assert!(filter.matches_extension(Path::new("/src/main.go")));
        assert!(filter.matches_extension(Path::new("/src/MAIN.GO")));
        assert!(filter.matches_extension(Path::new("/src/main.Go")));
    }

    #[cfg(unix)]
    #[test]
    fn test_exclusion_is_a_plain_string_prefix() {
        let filter = create_test_filter(&["/a/b"]);

        assert!(filter.is_excluded(Path::new("/a/b/main.go")));
        assert!(filter.is_excluded(Path::new("/a/bc/main.go")));
        assert!(!filter.is_excluded(Path::new("/a/c/main.go")));
    }

    #[cfg(unix)]
    #[test]
    fn test_exclusion_wins_over_extension() {
        let filter = create_test_filter(&["/project/vendor"]);

        assert_eq!(
            filter.decide(Path::new("/project/vendor/lib.go")),
            FilterDecision::Excluded
        );
        assert_eq!(
            filter.decide(Path::new("/project/readme.md")),
            FilterDecision::ExtensionMismatch
        );
        assert_eq!(
            filter.decide(Path::new("/project/main.go")),
            FilterDecision::Accept
        );
    }

    #[test]
    fn test_relative_exclusions_are_normalized() {
        let filter = create_test_filter(&["vendor"]);
        let vendored = std::env::current_dir().unwrap().join("vendor/dep.go");

        assert!(filter.is_excluded(&vendored));
    }

    #[cfg(unix)]
    #[test]
    fn test_select_keeps_only_accepted_paths() {
        let filter = create_test_filter(&["/p/skip"]);
        let candidates = vec![
            PathBuf::from("/p/a.go"),
            PathBuf::from("/p/b.txt"),
            PathBuf::from("/p/skip/c.go"),
            PathBuf::from("/p/d.PY"),
        ];

        let selected = filter.select(&candidates);

        assert_eq!(
            selected,
            vec![PathBuf::from("/p/a.go"), PathBuf::from("/p/d.PY")]
        );
        for path in &selected {
            assert!(filter.matches_extension(path));
            assert!(!filter.is_excluded(path));
        }
    }
}
