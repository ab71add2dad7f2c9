//! Codestash backup library
//!
//! This crate implements backup and restore for project directories. The
//! center of it is the selection policy: for every file under the projects
//! root, the [`Classifier`] decides whether it belongs in the backup, and
//! the [`Walker`] turns that policy into an ordered file selection. Around
//! it sit the archive builder (streaming tar+gzip), the restorer (filtered
//! extraction), the profile store (named persisted rule sets), progress
//! reporting, and post-backup actions.
//!
//! # Example
//!
//! ```no_run
//! use codestash_backup::{ArchiveBuilder, RuleSet, Walker};
//! use std::path::Path;
//!
//! fn main() -> codestash_core::Result<()> {
//!     let rules = RuleSet::default();
//!     let selection = Walker::new(rules.clone())
//!         .walk(Path::new("/home/dev/projects"), &mut None)?;
//!
//!     let summary = ArchiveBuilder::new(rules.compression_level)
//!         .build(&selection, Path::new("backup.tar.gz"), &mut None)?;
//!
//!     println!("Archived {} files", summary.file_count);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod archive;
pub mod classify;
pub mod profile;
pub mod progress;
pub mod restore;
pub mod rules;
pub mod walker;

// Re-export commonly used types
pub use actions::{run_post_actions, ActionOutcome};
pub use archive::{ArchiveBuilder, BackupSummary};
pub use classify::{Classifier, Decision, ExcludeReason, IncludeReason};
pub use profile::{Profile, ProfileStore, DEFAULT_PROFILE_NAME};
pub use progress::{BackupProgress, RestoreProgress};
pub use restore::{RestoreReport, Restorer};
pub use rules::{RuleSet, DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_FILE_SIZE};
pub use walker::{SelectedFile, Selection, Walker};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_MAX_FILE_SIZE, 20 * 1024 * 1024);
        assert_eq!(DEFAULT_COMPRESSION_LEVEL, 9);
    }
}
