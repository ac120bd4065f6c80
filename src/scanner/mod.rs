pub mod collector;
pub mod file_filter;
pub mod paths;

pub use collector::{CollectedFiles, FileCollector};
pub use file_filter::{FilterDecision, InclusionFilter};
pub use paths::{normalize_path, normalize_paths};
