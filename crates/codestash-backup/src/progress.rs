//! Progress reporting for backup and restore operations.
//!
//! Progress is an observer with no effect on control flow: callers hold an
//! `Option` and pass `None` for quiet, dry-run, or non-interactive use.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;

/// Progress reporter for backup operations: a scan spinner followed by an
/// archive bar.
#[derive(Debug, Clone)]
pub struct BackupProgress {
    multi: Arc<MultiProgress>,
    scan_bar: Option<ProgressBar>,
    archive_bar: Option<ProgressBar>,
}

impl BackupProgress {
    pub fn new() -> Self {
        Self {
            multi: Arc::new(MultiProgress::new()),
            scan_bar: None,
            archive_bar: None,
        }
    }

    /// Starts the scanning phase spinner.
    pub fn start_scan(&mut self, message: &str) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        self.scan_bar = Some(bar);
    }

    pub fn update_scan(&self, message: &str) {
        if let Some(bar) = &self.scan_bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_scan(&self, message: &str) {
        if let Some(bar) = &self.scan_bar {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Starts the archive phase with a known file count.
    pub fn start_archive(&mut self, total_files: u64, message: &str) {
        let bar = self.multi.add(ProgressBar::new(total_files));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)")
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());
        self.archive_bar = Some(bar);
    }

    pub fn inc_archive(&self) {
        if let Some(bar) = &self.archive_bar {
            bar.inc(1);
        }
    }

    pub fn finish_archive(&self, message: &str) {
        if let Some(bar) = &self.archive_bar {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Clears all bars.
    pub fn finish_all(&self) {
        if let Some(bar) = &self.scan_bar {
            bar.finish_and_clear();
        }
        if let Some(bar) = &self.archive_bar {
            bar.finish_and_clear();
        }
    }
}

impl Default for BackupProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress reporter for restore operations.
#[derive(Debug, Clone)]
pub struct RestoreProgress {
    extract_bar: Option<ProgressBar>,
}

impl RestoreProgress {
    pub fn new() -> Self {
        Self { extract_bar: None }
    }

    /// Starts the extraction phase with a known entry count.
    pub fn start_extract(&mut self, total_files: u64, message: &str) {
        let bar = ProgressBar::new(total_files);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.green/blue}] {pos}/{len} files ({percent}%)")
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message(message.to_string());
        self.extract_bar = Some(bar);
    }

    pub fn inc_extract(&self) {
        if let Some(bar) = &self.extract_bar {
            bar.inc(1);
        }
    }

    pub fn finish_extract(&self, message: &str) {
        if let Some(bar) = &self.extract_bar {
            bar.finish_with_message(message.to_string());
        }
    }
}

impl Default for RestoreProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_progress_lifecycle() {
        let mut progress = BackupProgress::new();
        assert!(progress.scan_bar.is_none());

        progress.start_scan("Scanning...");
        assert!(progress.scan_bar.is_some());
        progress.update_scan("Found 100 files");
        progress.finish_scan("Scan complete");

        progress.start_archive(100, "Archiving...");
        assert!(progress.archive_bar.is_some());
        progress.inc_archive();
        progress.finish_archive("Done");
        progress.finish_all();
    }

    #[test]
    fn test_restore_progress_lifecycle() {
        let mut progress = RestoreProgress::new();
        progress.start_extract(10, "Extracting...");
        assert!(progress.extract_bar.is_some());
        progress.inc_extract();
        progress.finish_extract("Done");
    }
}
