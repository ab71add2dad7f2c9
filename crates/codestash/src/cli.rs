//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// codestash - back up project directories with smart file selection
#[derive(Parser, Debug)]
#[command(name = "codestash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Projects root directory (defaults to $CODESTASH_PROJECTS or the
    /// current directory)
    #[arg(short = 'p', long, value_name = "DIR")]
    pub projects_dir: Option<Utf8PathBuf>,

    /// Output archive path, or a directory to place a timestamped archive in
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Include virtualenv directories in the backup
    #[arg(short = 'v', long)]
    pub include_venv: bool,

    /// Patterns to exclude (bare names match a directory at any depth)
    #[arg(short = 'e', long = "exclude", num_args = 1.., value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Paths (relative to the projects root) to always include
    #[arg(short = 'i', long = "include", num_args = 1.., value_name = "PATH")]
    pub include: Vec<String>,

    /// Paths (relative to the projects root) to always exclude
    #[arg(long = "exclude-path", num_args = 1.., value_name = "PATH")]
    pub exclude_paths: Vec<String>,

    /// Back up only these projects
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub include_projects: Vec<String>,

    /// Leave these projects out of the backup
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub exclude_projects: Vec<String>,

    /// Maximum file size to include (e.g. 100MB, 1GB)
    #[arg(short = 'm', long, value_name = "SIZE")]
    pub max_size: Option<String>,

    /// Compression level (0-9, 0 = store only)
    #[arg(short = 'c', long, value_name = "LEVEL", value_parser = clap::value_parser!(u32).range(0..=9))]
    pub compression: Option<u32>,

    /// Disable automatic module directory detection
    #[arg(long)]
    pub no_auto_modules: bool,

    /// Save the effective settings as a named profile
    #[arg(long, value_name = "NAME")]
    pub create_profile: Option<String>,

    /// Start from a saved profile
    #[arg(long, value_name = "NAME")]
    pub use_profile: Option<String>,

    /// Create a profile named 'default' covering all current projects
    #[arg(long)]
    pub create_default_profile: bool,

    /// List saved profiles
    #[arg(long)]
    pub list_profiles: bool,

    /// Restore from a backup archive
    #[arg(long, value_name = "ARCHIVE", requires = "extract_dir")]
    pub restore: Option<Utf8PathBuf>,

    /// Directory to extract a restored backup into
    #[arg(long, value_name = "DIR", requires = "restore")]
    pub extract_dir: Option<Utf8PathBuf>,

    /// Restore only these projects
    #[arg(long, num_args = 1.., value_name = "NAME", requires = "restore")]
    pub restore_projects: Vec<String>,

    /// Walk and classify without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write detailed logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<Utf8PathBuf>,

    /// Logging level
    #[arg(long, value_name = "LEVEL", value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Command to run after a successful backup; {backup_file}, {date}
    /// and {time} are substituted (repeatable)
    #[arg(long = "post-action", value_name = "TEMPLATE")]
    pub post_actions: Vec<String>,

    /// Suppress status output and progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Show detailed help with examples
    #[arg(long)]
    pub help_detailed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Filter directive understood by tracing's EnvFilter.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
