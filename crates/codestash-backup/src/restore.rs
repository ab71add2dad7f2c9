//! Restore system: archive analysis and filtered extraction.

use crate::progress::RestoreProgress;
use codestash_core::{Error, Result};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of a restore operation.
#[derive(Debug, Clone)]
pub struct RestoreReport {
    /// Regular files written to the extraction directory
    pub restored: usize,

    /// Entries skipped (filtered out or unsafe paths)
    pub skipped: usize,

    /// Projects that were restored, in name order
    pub projects: Vec<String>,
}

/// Extracts selected contents of a backup archive.
pub struct Restorer {
    project_filter: Vec<String>,
}

impl Restorer {
    /// Creates a restorer. An empty filter restores every project.
    pub fn new(project_filter: Vec<String>) -> Self {
        Self { project_filter }
    }

    /// Lists the distinct top-level project names in an archive.
    pub fn projects_in_archive(archive_path: &Path) -> Result<BTreeSet<String>> {
        let mut projects = BTreeSet::new();

        for entry_path in Self::entry_paths(archive_path)? {
            if let Some(project) = top_component(&entry_path) {
                projects.insert(project.to_string());
            }
        }

        Ok(projects)
    }

    /// Extracts the filtered entries into `extract_dir` and reports counts.
    pub fn restore(
        &self,
        archive_path: &Path,
        extract_dir: &Path,
        progress: &mut Option<RestoreProgress>,
    ) -> Result<RestoreReport> {
        let available = Self::projects_in_archive(archive_path)?;

        let selected: BTreeSet<String> = if self.project_filter.is_empty() {
            available
        } else {
            let selected: BTreeSet<String> = available
                .into_iter()
                .filter(|p| self.project_filter.iter().any(|f| f == p))
                .collect();
            if selected.is_empty() {
                return Err(Error::projects_not_in_archive(&self.project_filter));
            }
            selected
        };

        std::fs::create_dir_all(extract_dir)
            .map_err(|e| Error::destination(extract_dir.display().to_string(), e))?;

        let total = Self::entry_paths(archive_path)?
            .iter()
            .filter(|p| top_component(p).is_some_and(|t| selected.contains(t)))
            .count();

        if let Some(p) = progress.as_mut() {
            p.start_extract(total as u64, "Restoring backup...");
        }

        let mut archive = open_archive(archive_path)?;
        let mut restored = 0;
        let mut skipped = 0;

        let entries = archive
            .entries()
            .map_err(|e| Error::archive_corrupt(archive_path.display().to_string(), e))?;

        for entry in entries {
            let mut entry =
                entry.map_err(|e| Error::archive_corrupt(archive_path.display().to_string(), e))?;

            let entry_path = entry
                .path()
                .map_err(|e| Error::archive_corrupt(archive_path.display().to_string(), e))?
                .into_owned();

            let in_selection = top_component(&entry_path)
                .is_some_and(|project| selected.contains(project));
            if !in_selection {
                skipped += 1;
                continue;
            }

            let is_file = entry.header().entry_type().is_file();

            // unpack_in refuses entries that would escape the destination
            let unpacked = entry.unpack_in(extract_dir)?;
            if !unpacked {
                warn!("Skipping unsafe archive entry: {}", entry_path.display());
                skipped += 1;
                continue;
            }

            if is_file {
                restored += 1;
                debug!("Restored: {}", entry_path.display());
            }

            if let Some(p) = progress.as_ref() {
                p.inc_extract();
            }
        }

        if let Some(p) = progress.as_ref() {
            p.finish_extract(&format!("Restored {} files", restored));
        }

        Ok(RestoreReport {
            restored,
            skipped,
            projects: selected.into_iter().collect(),
        })
    }

    /// Collects every entry path in the archive, verifying it is readable.
    fn entry_paths(archive_path: &Path) -> Result<Vec<PathBuf>> {
        let mut archive = open_archive(archive_path)?;
        let mut paths = Vec::new();

        let entries = archive
            .entries()
            .map_err(|e| Error::archive_corrupt(archive_path.display().to_string(), e))?;

        for entry in entries {
            let entry =
                entry.map_err(|e| Error::archive_corrupt(archive_path.display().to_string(), e))?;
            let path = entry
                .path()
                .map_err(|e| Error::archive_corrupt(archive_path.display().to_string(), e))?;
            paths.push(path.into_owned());
        }

        Ok(paths)
    }
}

fn open_archive(archive_path: &Path) -> Result<tar::Archive<GzDecoder<File>>> {
    let file = File::open(archive_path)
        .map_err(|e| Error::archive_corrupt(archive_path.display().to_string(), e))?;
    Ok(tar::Archive::new(GzDecoder::new(file)))
}

/// First normal component of an entry path.
fn top_component(path: &Path) -> Option<&str> {
    path.components().find_map(|c| match c {
        Component::Normal(name) => name.to_str(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveBuilder;
    use crate::rules::RuleSet;
    use crate::walker::Walker;
    use std::fs;
    use tempfile::TempDir;

    fn build_archive(dest: &Path) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("A/src")).unwrap();
        fs::create_dir_all(root.join("B")).unwrap();
        fs::write(root.join("A/src/main.py"), "print('a')\n").unwrap();
        fs::write(root.join("A/README.md"), "# A\n").unwrap();
        fs::write(root.join("B/readme.txt"), "b\n").unwrap();

        let selection = Walker::new(RuleSet::default()).walk(root, &mut None).unwrap();
        ArchiveBuilder::new(6)
            .build(&selection, dest, &mut None)
            .unwrap();
        tmp
    }

    #[test]
    fn test_projects_in_archive() {
        let out = TempDir::new().unwrap();
        let archive = out.path().join("backup.tar.gz");
        let _tree = build_archive(&archive);

        let projects = Restorer::projects_in_archive(&archive).unwrap();
        assert_eq!(
            projects.into_iter().collect::<Vec<_>>(),
            vec!["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn test_restore_all() {
        let out = TempDir::new().unwrap();
        let archive = out.path().join("backup.tar.gz");
        let _tree = build_archive(&archive);

        let extract = TempDir::new().unwrap();
        let report = Restorer::new(vec![])
            .restore(&archive, extract.path(), &mut None)
            .unwrap();

        assert_eq!(report.restored, 3);
        assert_eq!(report.projects, vec!["A".to_string(), "B".to_string()]);
        assert!(extract.path().join("A/src/main.py").is_file());
        assert!(extract.path().join("B/readme.txt").is_file());
    }

    #[test]
    fn test_restore_project_filter() {
        let out = TempDir::new().unwrap();
        let archive = out.path().join("backup.tar.gz");
        let _tree = build_archive(&archive);

        let extract = TempDir::new().unwrap();
        let report = Restorer::new(vec!["A".to_string()])
            .restore(&archive, extract.path(), &mut None)
            .unwrap();

        assert_eq!(report.restored, 2);
        assert_eq!(report.projects, vec!["A".to_string()]);
        assert!(extract.path().join("A/src/main.py").is_file());
        assert!(!extract.path().join("B").exists());
    }

    #[test]
    fn test_restore_unknown_projects_fails() {
        let out = TempDir::new().unwrap();
        let archive = out.path().join("backup.tar.gz");
        let _tree = build_archive(&archive);

        let extract = TempDir::new().unwrap();
        let err = Restorer::new(vec!["nope".to_string()])
            .restore(&archive, extract.path(), &mut None)
            .unwrap_err();
        assert!(matches!(err, Error::ProjectsNotInArchive { .. }));
    }

    #[test]
    fn test_missing_archive_is_corrupt_error() {
        let extract = TempDir::new().unwrap();
        let err = Restorer::new(vec![])
            .restore(Path::new("/no/such/backup.tar.gz"), extract.path(), &mut None)
            .unwrap_err();
        assert!(matches!(err, Error::ArchiveCorrupt { .. }));
    }

    #[test]
    fn test_garbage_archive_is_corrupt_error() {
        let out = TempDir::new().unwrap();
        let archive = out.path().join("bogus.tar.gz");
        fs::write(&archive, b"definitely not a gzip stream").unwrap();

        let err = Restorer::projects_in_archive(&archive).unwrap_err();
        assert!(matches!(err, Error::ArchiveCorrupt { .. }));
    }

    #[test]
    fn test_round_trip_preserves_content() {
        let out = TempDir::new().unwrap();
        let archive = out.path().join("backup.tar.gz");
        let tree = build_archive(&archive);

        let extract = TempDir::new().unwrap();
        Restorer::new(vec![])
            .restore(&archive, extract.path(), &mut None)
            .unwrap();

        let original = fs::read(tree.path().join("A/src/main.py")).unwrap();
        let restored = fs::read(extract.path().join("A/src/main.py")).unwrap();
        assert_eq!(original, restored);
    }
}
