use crate::export::ExportProgress;
use crate::ui::output::format_duration;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message("Assembling document...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_file_progress(pb: &ProgressBar, progress: &ExportProgress) {
    pb.set_position(progress.attempted() as u64);

    if let Some(ref current_file) = progress.current_file {
        let eta = if progress.attempted() > 0 {
            let estimated_remaining = progress.estimated_remaining();
            if estimated_remaining.as_secs() > 0 {
                format!(" (ETA: {})", format_duration(estimated_remaining))
            } else {
                String::new()
            }
        } else {
            String::new()
        };

        pb.set_message(format!("Added {}{}", current_file, eta));
    } else {
        pb.set_message("Assembling document...");
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_manager_creation() {
        let manager = ProgressManager::new(true);
        assert!(manager.enabled);

        let disabled_manager = ProgressManager::new(false);
        assert!(!disabled_manager.enabled);
    }

    #[test]
    fn test_progress_bar_creation() {
        let manager = ProgressManager::new(true);

        let file_pb = manager.create_file_progress(100);

        // Visibility depends on whether a TTY is attached
        assert!(file_pb.length().unwrap_or(0) > 0 || file_pb.length().is_none());
        assert!(!file_pb.message().is_empty());
    }

    #[test]
    fn test_disabled_progress_bars() {
        let manager = ProgressManager::new(false);

        assert!(manager.create_file_progress(100).is_hidden());
    }

    #[test]
    fn test_update_file_progress_tracks_attempted_files() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);

        let mut progress = ExportProgress::new(3);
        progress.update_file("a.go".to_string(), 10, 0);
        progress.add_skipped(std::path::Path::new("b.go"), "unreadable");
        update_file_progress(&pb, &progress);

        assert_eq!(pb.position(), 2);
        assert!(pb.message().starts_with("Added a.go"));
    }

    #[test]
    fn test_suspend_runs_closure() {
        let manager = ProgressManager::new(false);
        assert_eq!(manager.suspend(|| 7), 7);
    }
}
