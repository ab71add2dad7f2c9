//! Archive creation for backups.
//!
//! Streams the selected files straight through a tar builder into a gzip
//! encoder. Level 0 maps to store-only; the archive is written once and is
//! immutable afterwards.

use crate::progress::BackupProgress;
use crate::walker::Selection;
use codestash_core::{Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

/// Summary of one backup run.
#[derive(Debug, Clone)]
pub struct BackupSummary {
    /// Path of the archive (the would-be path in dry-run mode)
    pub archive_path: PathBuf,

    /// Number of files written to the archive
    pub file_count: usize,

    /// Total uncompressed size of the selected files
    pub total_bytes: u64,

    /// Size of the archive on disk (0 in dry-run mode)
    pub archive_bytes: u64,

    /// Files that vanished or became unreadable between selection and
    /// archiving
    pub skipped: usize,

    /// Duration of the operation in seconds
    pub duration_seconds: f64,
}

/// Builds a compressed archive from a selection.
pub struct ArchiveBuilder {
    compression_level: u32,
    dry_run: bool,
}

impl ArchiveBuilder {
    /// Creates a builder with the given compression level (clamped to 0-9;
    /// 0 = store only).
    pub fn new(compression_level: u32) -> Self {
        Self {
            compression_level: compression_level.min(9),
            dry_run: false,
        }
    }

    /// Enables or disables dry-run mode. A dry run writes nothing but
    /// reports the same counts as a real run over the same tree.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Writes the archive (or simulates doing so) and returns a summary.
    pub fn build(
        &self,
        selection: &Selection,
        dest: &Path,
        progress: &mut Option<BackupProgress>,
    ) -> Result<BackupSummary> {
        let start = Instant::now();

        if self.dry_run {
            return Ok(BackupSummary {
                archive_path: dest.to_path_buf(),
                file_count: selection.len(),
                total_bytes: selection.total_bytes(),
                archive_bytes: 0,
                skipped: 0,
                duration_seconds: start.elapsed().as_secs_f64(),
            });
        }

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::destination(parent.display().to_string(), e))?;
            }
        }

        let file = File::create(dest)
            .map_err(|e| Error::destination(dest.display().to_string(), e))?;
        let encoder = GzEncoder::new(BufWriter::new(file), self.compression());
        let mut tar = tar::Builder::new(encoder);

        if let Some(p) = progress.as_mut() {
            p.start_archive(selection.len() as u64, "Creating archive...");
        }

        let mut file_count = 0;
        let mut total_bytes = 0u64;
        let mut skipped = 0;

        for selected in &selection.files {
            // A file disappearing after selection is a local filesystem
            // problem, not an archive failure: skip it and keep going.
            let mut source = match File::open(&selected.source) {
                Ok(f) => f,
                Err(e) => {
                    warn!("Skipping {}: {}", selected.source.display(), e);
                    skipped += 1;
                    if let Some(p) = progress.as_ref() {
                        p.inc_archive();
                    }
                    continue;
                }
            };

            tar.append_file(&selected.archive_path, &mut source)?;
            file_count += 1;
            total_bytes += selected.size;

            if let Some(p) = progress.as_ref() {
                p.inc_archive();
            }
        }

        let encoder = tar.into_inner()?;
        let mut writer = encoder.finish()?;
        writer.flush()?;
        drop(writer);

        if let Some(p) = progress.as_ref() {
            p.finish_archive(&format!("Archived {} files", file_count));
        }

        let archive_bytes = std::fs::metadata(dest)?.len();

        Ok(BackupSummary {
            archive_path: dest.to_path_buf(),
            file_count,
            total_bytes,
            archive_bytes,
            skipped,
            duration_seconds: start.elapsed().as_secs_f64(),
        })
    }

    fn compression(&self) -> Compression {
        if self.compression_level == 0 {
            Compression::none()
        } else {
            Compression::new(self.compression_level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;
    use crate::walker::Walker;
    use flate2::read::GzDecoder;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("app/src")).unwrap();
        fs::write(root.join("app/src/main.py"), "print('hi')\n".repeat(100)).unwrap();
        fs::write(root.join("app/README.md"), "# app\n").unwrap();
        tmp
    }

    fn select(root: &Path) -> Selection {
        Walker::new(RuleSet::default()).walk(root, &mut None).unwrap()
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let tar_gz = File::open(archive).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(tar_gz));
        archive
            .entries()
            .unwrap()
            .map(|e| {
                e.unwrap()
                    .path()
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_archive_creation() {
        let source = sample_tree();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("backup.tar.gz");

        let selection = select(source.path());
        let summary = ArchiveBuilder::new(9)
            .build(&selection, &dest, &mut None)
            .unwrap();

        assert!(dest.exists());
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.total_bytes, selection.total_bytes());
        assert!(summary.archive_bytes > 0);
        assert_eq!(summary.skipped, 0);

        let names = entry_names(&dest);
        assert!(names.contains(&"app/src/main.py".to_string()));
        assert!(names.contains(&"app/README.md".to_string()));
    }

    #[test]
    fn test_dry_run_writes_nothing_and_matches_counts() {
        let source = sample_tree();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("backup.tar.gz");

        let selection = select(source.path());
        let dry = ArchiveBuilder::new(9)
            .dry_run(true)
            .build(&selection, &dest, &mut None)
            .unwrap();

        assert!(!dest.exists());
        assert_eq!(dry.archive_bytes, 0);

        let real = ArchiveBuilder::new(9)
            .build(&selection, &dest, &mut None)
            .unwrap();

        assert_eq!(dry.file_count, real.file_count);
        assert_eq!(dry.total_bytes, real.total_bytes);
    }

    #[test]
    fn test_store_only_level_zero() {
        let source = sample_tree();
        let out = TempDir::new().unwrap();
        let stored = out.path().join("stored.tar.gz");
        let packed = out.path().join("packed.tar.gz");

        let selection = select(source.path());
        let stored_summary = ArchiveBuilder::new(0)
            .build(&selection, &stored, &mut None)
            .unwrap();
        let packed_summary = ArchiveBuilder::new(9)
            .build(&selection, &packed, &mut None)
            .unwrap();

        // The repeated content compresses; the stored archive does not.
        assert!(stored_summary.archive_bytes > packed_summary.archive_bytes);
        assert_eq!(entry_names(&stored), entry_names(&packed));
    }

    #[test]
    fn test_vanished_file_is_skipped() {
        let source = sample_tree();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("backup.tar.gz");

        let selection = select(source.path());
        fs::remove_file(source.path().join("app/README.md")).unwrap();

        let summary = ArchiveBuilder::new(6)
            .build(&selection, &dest, &mut None)
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.file_count, 1);
        assert_eq!(entry_names(&dest), vec!["app/src/main.py".to_string()]);
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let source = sample_tree();
        let selection = select(source.path());

        // A regular file cannot serve as the parent directory
        let out = TempDir::new().unwrap();
        let blocker = out.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let err = ArchiveBuilder::new(6)
            .build(&selection, &blocker.join("backup.tar.gz"), &mut None)
            .unwrap_err();
        assert!(matches!(err, Error::DestinationError { .. }));
    }
}
