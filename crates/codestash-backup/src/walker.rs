//! Project enumeration and file selection.
//!
//! The walker treats every immediate subdirectory of the projects root as a
//! project, detects module directories, and classifies every file it can
//! reach. Unreadable files and directories are skipped with a warning and
//! counted; one bad project must not block the others.

use crate::classify::{Classifier, Decision, ExcludeReason, IncludeReason};
use crate::progress::BackupProgress;
use crate::rules::{RuleSet, PACKAGE_MARKER, VENV_DIR_NAMES};
use codestash_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One file destined for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Absolute path on disk
    pub source: PathBuf,

    /// Archive-relative path (`<project>/<path-under-project>`)
    pub archive_path: PathBuf,

    /// Size in bytes
    pub size: u64,
}

/// Counters accumulated during a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Files excluded because they exceed the size limit
    pub skipped_oversize: usize,

    /// Bytes saved by the size limit
    pub oversize_bytes: u64,

    /// Files or directories skipped because they could not be read
    pub unreadable: usize,

    /// Module directories detected
    pub module_dirs: usize,

    /// Files included via explicit include paths
    pub explicit_includes: usize,
}

/// Ordered selection produced by one walk.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub files: Vec<SelectedFile>,
    pub stats: WalkStats,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total uncompressed size of the selected files.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Walks the projects root and produces a [`Selection`].
pub struct Walker {
    rules: RuleSet,
}

impl Walker {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Enumerate projects under the root and classify every file.
    ///
    /// The resulting selection is deterministic for a given tree and rule
    /// set: projects and files are visited in file-name order, so dry runs
    /// agree with real runs.
    pub fn walk(
        &self,
        projects_root: &Path,
        progress: &mut Option<BackupProgress>,
    ) -> Result<Selection> {
        if !projects_root.is_dir() {
            return Err(Error::projects_dir_not_found(
                projects_root.display().to_string(),
            ));
        }

        let mut selection = Selection::default();

        if let Some(p) = progress.as_mut() {
            p.start_scan("Scanning projects...");
        }

        let projects = self.project_dirs(projects_root, &mut selection.stats)?;

        let mut module_dirs = Vec::new();
        if self.rules.detect_modules {
            for project_dir in &projects {
                detect_module_dirs(projects_root, project_dir, &mut module_dirs);
            }
        }
        selection.stats.module_dirs = module_dirs.len();

        let classifier = Classifier::new(&self.rules)?.with_module_dirs(module_dirs);

        for project_dir in &projects {
            self.walk_project(projects_root, project_dir, &classifier, &mut selection, progress);
        }

        if let Some(p) = progress.as_ref() {
            p.finish_scan(&format!("Selected {} files", selection.len()));
        }

        Ok(selection)
    }

    /// Immediate subdirectories of the root, in name order, minus projects
    /// ruled out by the project filters. A filtered-out project is still
    /// walked when an explicit include path points inside it.
    fn project_dirs(&self, root: &Path, stats: &mut WalkStats) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();

        let entries = std::fs::read_dir(root)?;
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    stats.unreadable += 1;
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let has_include_into = self
                .rules
                .include_paths
                .iter()
                .any(|p| Path::new(p).starts_with(name));

            if !has_include_into {
                if !self.rules.include_projects.is_empty()
                    && !self.rules.include_projects.iter().any(|p| p == name)
                {
                    info!("Skipping project '{}': not in include list", name);
                    continue;
                }
                if self.rules.exclude_projects.iter().any(|p| p == name) {
                    info!("Skipping project '{}': in exclude list", name);
                    continue;
                }
            }

            dirs.push(path);
        }

        dirs.sort();
        Ok(dirs)
    }

    fn walk_project(
        &self,
        root: &Path,
        project_dir: &Path,
        classifier: &Classifier,
        selection: &mut Selection,
        progress: &mut Option<BackupProgress>,
    ) {
        let walk = WalkDir::new(project_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if !e.file_type().is_dir() {
                    return true;
                }
                let rel = e.path().strip_prefix(root).unwrap_or(e.path());
                !classifier.should_prune_dir(rel)
            });

        for entry in walk {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    selection.stats.unreadable += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let rel_path = match entry.path().strip_prefix(root) {
                Ok(p) => p.to_path_buf(),
                Err(_) => continue,
            };

            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    warn!("Cannot stat {}: {}", entry.path().display(), e);
                    selection.stats.unreadable += 1;
                    continue;
                }
            };

            match classifier.classify(&rel_path, size) {
                Decision::Include(reason) => {
                    if reason == IncludeReason::ExplicitPath {
                        selection.stats.explicit_includes += 1;
                    }
                    debug!("Added: {}", rel_path.display());
                    selection.files.push(SelectedFile {
                        source: entry.path().to_path_buf(),
                        archive_path: rel_path,
                        size,
                    });

                    if let Some(p) = progress.as_ref() {
                        if selection.len() % 100 == 0 {
                            p.update_scan(&format!("Selected {} files...", selection.len()));
                        }
                    }
                }
                Decision::Exclude(ExcludeReason::TooLarge) => {
                    selection.stats.skipped_oversize += 1;
                    selection.stats.oversize_bytes += size;
                    info!(
                        "Skipped (too large): {} ({})",
                        rel_path.display(),
                        codestash_core::format_bytes(size)
                    );
                }
                Decision::Exclude(_) => {}
            }
        }
    }
}

/// Find module directories (those containing the package marker) under a
/// project, recording paths relative to the projects root. Regenerable and
/// virtualenv directories are never scanned for modules.
fn detect_module_dirs(root: &Path, project_dir: &Path, out: &mut Vec<PathBuf>) {
    const SKIP_NAMES: &[&str] = &[
        "__pycache__",
        ".git",
        ".idea",
        "node_modules",
        "target",
        "dist",
        "build",
        ".pytest_cache",
        ".mypy_cache",
        ".ipynb_checkpoints",
    ];

    let walk = WalkDir::new(project_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() {
                return true;
            }
            e.file_name()
                .to_str()
                .map(|name| !SKIP_NAMES.contains(&name) && !VENV_DIR_NAMES.contains(&name))
                .unwrap_or(false)
        });

    for entry in walk.flatten() {
        if entry.file_type().is_dir() && entry.path().join(PACKAGE_MARKER).is_file() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                debug!("Detected module directory: {}", rel.display());
                out.push(rel.to_path_buf());
            }
        }
    }
}
