//! Selection rule set and built-in rule tables.
//!
//! A [`RuleSet`] captures every parameter governing one backup run. The
//! built-in tables below (always-excluded directories, essential file sets,
//! virtualenv names) are compiled into every classifier; the rule set itself
//! only carries user-supplied additions, so persisted profiles round-trip
//! exactly what the user configured.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default maximum file size to include (20 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Default gzip compression level (9 = maximum, as the archive is written once).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Glob patterns that are ALWAYS excluded from backups.
/// These match regenerable files that bloat backup size.
pub const ALWAYS_EXCLUDE: &[&str] = &[
    "**/__pycache__",
    "**/__pycache__/**",
    "**/.git",
    "**/.git/**",
    "**/.idea",
    "**/.idea/**",
    "**/node_modules",
    "**/node_modules/**",
    "**/target",
    "**/target/**",
    "**/dist",
    "**/dist/**",
    "**/build",
    "**/build/**",
    "**/.pytest_cache",
    "**/.pytest_cache/**",
    "**/.mypy_cache",
    "**/.mypy_cache/**",
    "**/.ipynb_checkpoints",
    "**/.ipynb_checkpoints/**",
    "**/coverage",
    "**/coverage/**",
    "**/htmlcov",
    "**/htmlcov/**",
    "**/logs",
    "**/logs/**",
    "**/temp",
    "**/temp/**",
    "**/tmp",
    "**/tmp/**",
    "**/data",
    "**/data/**",
    "**/output",
    "**/output/**",
    "**/downloads",
    "**/downloads/**",
];

/// File extensions treated as essential development files.
pub const ESSENTIAL_EXTENSIONS: &[&str] = &[
    ".py", ".rs", ".json", ".yml", ".yaml", ".md", ".txt", ".ini", ".cfg", ".toml", ".html",
    ".css", ".js", ".xml", ".iml", ".sql", ".rst", ".sh", ".bat", ".ps1", ".ipynb", ".java",
    ".properties", ".gradle", ".dart", ".kt", ".kts", ".tsx", ".ts", ".jsx",
];

/// Exact filenames treated as essential regardless of extension.
pub const ESSENTIAL_FILENAMES: &[&str] = &[
    "requirements.txt",
    "Pipfile",
    "Pipfile.lock",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "pyvenv.cfg",
    "README.md",
    ".env.example",
    ".gitignore",
    "Dockerfile",
    "docker-compose.yml",
    "Makefile",
    "LICENSE",
    ".flake8",
    "poetry.lock",
    "Cargo.toml",
    "Cargo.lock",
    "package.json",
    "package-lock.json",
    "tsconfig.json",
    ".prettierrc",
    ".eslintrc",
    "tox.ini",
    ".coveragerc",
    ".babelrc",
    "webpack.config.js",
    "vue.config.js",
    "angular.json",
    "build.gradle",
];

/// Directory names recognized as virtualenv roots.
pub const VENV_DIR_NAMES: &[&str] = &["venv", ".venv", "env", ".env", "virtualenv"];

/// Marker file whose presence makes a directory a module directory.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// The full set of inclusion/exclusion parameters governing one backup run.
///
/// Explicit include paths always win over pattern exclusions; the size limit
/// applies only to files not explicitly included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// File extensions (with leading dot, lowercase) to include
    pub include_extensions: BTreeSet<String>,

    /// Exact filenames to include
    pub include_filenames: BTreeSet<String>,

    /// Additional exclusion patterns (glob syntax; bare names match a
    /// path component at any depth)
    pub exclude_patterns: Vec<String>,

    /// Paths relative to the projects root that are always included
    pub include_paths: Vec<String>,

    /// Paths relative to the projects root that are always excluded
    pub exclude_paths: Vec<String>,

    /// Project names to include (empty means all)
    pub include_projects: Vec<String>,

    /// Project names to exclude
    pub exclude_projects: Vec<String>,

    /// Whether virtualenv directories participate in the backup
    pub include_venv: bool,

    /// Whether module directories are auto-detected and swept in
    pub detect_modules: bool,

    /// Maximum file size in bytes for non-explicit includes
    pub max_file_size: u64,

    /// Compression level (0-9, 0 = store only)
    pub compression_level: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            include_extensions: ESSENTIAL_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_filenames: ESSENTIAL_FILENAMES.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: Vec::new(),
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            include_projects: Vec::new(),
            exclude_projects: Vec::new(),
            include_venv: false,
            detect_modules: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl RuleSet {
    /// Clamp the compression level into the valid 0-9 range.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    /// Returns true if the given directory name is a virtualenv root name.
    pub fn is_venv_dir_name(name: &str) -> bool {
        VENV_DIR_NAMES.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = RuleSet::default();
        assert!(rules.include_extensions.contains(".py"));
        assert!(rules.include_extensions.contains(".rs"));
        assert!(rules.include_filenames.contains("Makefile"));
        assert!(rules.include_filenames.contains("pyvenv.cfg"));
        assert!(rules.exclude_patterns.is_empty());
        assert!(!rules.include_venv);
        assert!(rules.detect_modules);
        assert_eq!(rules.max_file_size, 20 * 1024 * 1024);
        assert_eq!(rules.compression_level, 9);
    }

    #[test]
    fn test_compression_level_clamped() {
        let rules = RuleSet::default().with_compression_level(15);
        assert_eq!(rules.compression_level, 9);

        let rules = RuleSet::default().with_compression_level(0);
        assert_eq!(rules.compression_level, 0);
    }

    #[test]
    fn test_venv_dir_names() {
        assert!(RuleSet::is_venv_dir_name("venv"));
        assert!(RuleSet::is_venv_dir_name(".venv"));
        assert!(RuleSet::is_venv_dir_name("virtualenv"));
        assert!(!RuleSet::is_venv_dir_name("environment"));
    }

    #[test]
    fn test_always_exclude_not_empty() {
        assert!(!ALWAYS_EXCLUDE.is_empty());
        assert!(ALWAYS_EXCLUDE.contains(&"**/node_modules"));
        assert!(ALWAYS_EXCLUDE.contains(&"**/__pycache__/**"));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut rules = RuleSet::default();
        rules.exclude_patterns.push("*.log".to_string());
        rules.include_projects.push("api".to_string());
        rules.max_file_size = 1024;

        let json = serde_json::to_string(&rules).unwrap();
        let back: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rules);
    }
}
