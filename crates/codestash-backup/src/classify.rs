//! Path classification for backup selection.
//!
//! The classifier decides, for each file under the projects root, whether it
//! belongs in the backup. It is a pure function of the relative path, the
//! file size, and state prepared at construction time (compiled exclusion
//! globset, explicit path prefixes, detected module directories); it performs
//! no I/O of its own.

use crate::rules::{RuleSet, ALWAYS_EXCLUDE, VENV_DIR_NAMES};
use codestash_core::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Why a path was included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeReason {
    /// Path lies under an explicit include entry
    ExplicitPath,
    /// Filename or extension is in the essential sets
    Essential,
    /// Path lies under a detected module directory
    ModuleDir,
}

/// Why a path was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeReason {
    /// Path lies under an explicit exclude entry
    ExplicitPath,
    /// Project is not in the include-projects list
    ProjectNotIncluded,
    /// Project is in the exclude-projects list
    ProjectExcluded,
    /// Path is inside a virtualenv directory
    Virtualenv,
    /// Path matches an exclusion pattern
    Pattern,
    /// File exceeds the maximum size
    TooLarge,
    /// No rule included the file
    Default,
}

/// Classification outcome for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Include(IncludeReason),
    Exclude(ExcludeReason),
}

impl Decision {
    /// Returns true for any include outcome.
    pub fn is_include(&self) -> bool {
        matches!(self, Decision::Include(_))
    }
}

/// Compiled selection policy for one backup run.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
    exclude_globs: GlobSet,
    include_paths: Vec<PathBuf>,
    exclude_paths: Vec<PathBuf>,
    module_dirs: Vec<PathBuf>,
}

impl Classifier {
    /// Compile a classifier from a rule set.
    ///
    /// The built-in [`ALWAYS_EXCLUDE`] patterns are compiled in alongside the
    /// rule set's own patterns. Bare user patterns (no `/` and no glob
    /// metacharacters spanning directories) are expanded to match a path
    /// component at any depth, so `-e logs` behaves like the directory-name
    /// exclusions users expect.
    pub fn new(rules: &RuleSet) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in ALWAYS_EXCLUDE {
            builder.add(compile_glob(pattern)?);
        }

        for pattern in &rules.exclude_patterns {
            for expanded in expand_pattern(pattern) {
                builder.add(compile_glob(&expanded)?);
            }
        }

        let exclude_globs = builder
            .build()
            .map_err(|e| Error::invalid_pattern("<combined>", e.to_string()))?;

        Ok(Self {
            rules: rules.clone(),
            exclude_globs,
            include_paths: rules.include_paths.iter().map(|p| normalize_entry(p)).collect(),
            exclude_paths: rules.exclude_paths.iter().map(|p| normalize_entry(p)).collect(),
            module_dirs: Vec::new(),
        })
    }

    /// Attach the module directories detected by the walker.
    pub fn with_module_dirs(mut self, module_dirs: Vec<PathBuf>) -> Self {
        self.module_dirs = module_dirs;
        self
    }

    /// Classify one file path (relative to the projects root, first
    /// component = project name) with its size in bytes.
    ///
    /// Decision order, first match wins:
    /// explicit include, explicit exclude, project filters, virtualenv,
    /// exclusion patterns, size limit, essential file sets, module
    /// directories, default exclude.
    pub fn classify(&self, rel_path: &Path, size: u64) -> Decision {
        if self.is_explicitly_included(rel_path) {
            return Decision::Include(IncludeReason::ExplicitPath);
        }

        if self.exclude_paths.iter().any(|p| rel_path.starts_with(p)) {
            return Decision::Exclude(ExcludeReason::ExplicitPath);
        }

        if let Some(project) = project_of(rel_path) {
            if !self.rules.include_projects.is_empty()
                && !self.rules.include_projects.iter().any(|p| p == project)
            {
                return Decision::Exclude(ExcludeReason::ProjectNotIncluded);
            }
            if self.rules.exclude_projects.iter().any(|p| p == project) {
                return Decision::Exclude(ExcludeReason::ProjectExcluded);
            }
        }

        if !self.rules.include_venv && in_venv(rel_path) {
            return Decision::Exclude(ExcludeReason::Virtualenv);
        }

        if self.exclude_globs.is_match(rel_path) {
            return Decision::Exclude(ExcludeReason::Pattern);
        }

        if size > self.rules.max_file_size {
            return Decision::Exclude(ExcludeReason::TooLarge);
        }

        if self.is_essential(rel_path) {
            return Decision::Include(IncludeReason::Essential);
        }

        if self.rules.detect_modules && self.module_dirs.iter().any(|m| rel_path.starts_with(m)) {
            return Decision::Include(IncludeReason::ModuleDir);
        }

        Decision::Exclude(ExcludeReason::Default)
    }

    /// Returns true if the path lies under an explicit include entry.
    pub fn is_explicitly_included(&self, rel_path: &Path) -> bool {
        self.include_paths.iter().any(|p| rel_path.starts_with(p))
    }

    /// Returns true if the walker should skip this directory entirely.
    ///
    /// A directory is pruned when it is excluded by path, pattern, or the
    /// virtualenv rule, unless an explicit include path or module directory
    /// lies at or below it (those must stay reachable: explicit includes win
    /// over every exclusion).
    pub fn should_prune_dir(&self, rel_dir: &Path) -> bool {
        let reachable_include = self.include_paths.iter().chain(self.module_dirs.iter());
        for target in reachable_include {
            if rel_dir.starts_with(target) || target.starts_with(rel_dir) {
                return false;
            }
        }

        if self.exclude_paths.iter().any(|p| rel_dir.starts_with(p)) {
            return true;
        }

        if !self.rules.include_venv
            && rel_dir.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .is_some_and(|name| VENV_DIR_NAMES.contains(&name))
            })
        {
            return true;
        }

        self.exclude_globs.is_match(rel_dir)
    }

    fn is_essential(&self, rel_path: &Path) -> bool {
        if let Some(name) = rel_path.file_name().and_then(|n| n.to_str()) {
            if self.rules.include_filenames.contains(name) {
                return true;
            }
        }

        if let Some(ext) = rel_path.extension().and_then(|e| e.to_str()) {
            let dotted = format!(".{}", ext.to_lowercase());
            if self.rules.include_extensions.contains(&dotted) {
                return true;
            }
        }

        false
    }
}

/// First path component, i.e. the project name.
fn project_of(rel_path: &Path) -> Option<&str> {
    rel_path
        .components()
        .next()
        .and_then(|c| c.as_os_str().to_str())
}

/// Whether any parent directory component is a virtualenv name.
fn in_venv(rel_path: &Path) -> bool {
    rel_path
        .parent()
        .map(|parent| {
            parent.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .is_some_and(|name| VENV_DIR_NAMES.contains(&name))
            })
        })
        .unwrap_or(false)
}

/// Normalize an explicit include/exclude entry to a relative path.
fn normalize_entry(entry: &str) -> PathBuf {
    PathBuf::from(entry.trim_matches('/'))
}

fn compile_glob(pattern: &str) -> Result<Glob> {
    Glob::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))
}

/// Expand a bare pattern (no `/`) so it matches a path component at any
/// depth; patterns containing `/` are used verbatim.
fn expand_pattern(pattern: &str) -> Vec<String> {
    if pattern.contains('/') || pattern.starts_with("**") {
        vec![pattern.to_string()]
    } else {
        vec![format!("**/{pattern}"), format!("**/{pattern}/**")]
    }
}
