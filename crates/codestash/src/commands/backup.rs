//! Backup command: resolve settings, walk, archive, post-actions.

use crate::cli::Cli;
use crate::output;
use crate::settings::EffectiveSettings;
use anyhow::Result;
use codestash_backup::{run_post_actions, ArchiveBuilder, BackupProgress, ProfileStore, Walker};
use codestash_core::format_bytes;
use std::path::PathBuf;

pub fn run(cli: &Cli) -> Result<()> {
    let store = ProfileStore::open_default()?;
    let settings = resolve_settings(cli, &store)?;

    if let Some(name) = &cli.create_profile {
        store.save(name, &settings.to_profile())?;
        if !cli.quiet {
            output::success(&format!("Profile '{name}' created"));
        }
    }

    let projects_root = settings.resolve_projects_dir();
    let output_path = resolve_output_path(settings.output.clone());

    if !cli.quiet {
        output::header("Backup Projects");
        output::kv("Projects root", &projects_root.display().to_string());
        output::kv("Output", &output_path.display().to_string());
        output::kv(
            "Max file size",
            &format_bytes(settings.rules.max_file_size),
        );
        output::kv(
            "Compression",
            &settings.rules.compression_level.to_string(),
        );
        output::kv(
            "Include venv",
            if settings.rules.include_venv { "yes" } else { "no" },
        );
        output::kv(
            "Detect modules",
            if settings.rules.detect_modules { "yes" } else { "no" },
        );
        if !settings.rules.exclude_patterns.is_empty() {
            output::kv("Exclusions", &settings.rules.exclude_patterns.join(", "));
        }
        if !settings.rules.include_paths.is_empty() {
            output::kv("Inclusions", &settings.rules.include_paths.join(", "));
        }
        if !settings.rules.include_projects.is_empty() {
            output::kv(
                "Included projects",
                &settings.rules.include_projects.join(", "),
            );
        }
        if !settings.rules.exclude_projects.is_empty() {
            output::kv(
                "Excluded projects",
                &settings.rules.exclude_projects.join(", "),
            );
        }
        if cli.dry_run {
            output::warning("DRY RUN MODE - no archive will be written");
        }
        println!();
    }

    let mut progress = if cli.quiet || cli.dry_run {
        None
    } else {
        Some(BackupProgress::new())
    };

    let selection = Walker::new(settings.rules.clone()).walk(&projects_root, &mut progress)?;
    tracing::debug!(
        "selection complete: {} files, {} bytes",
        selection.len(),
        selection.total_bytes()
    );

    let summary = ArchiveBuilder::new(settings.rules.compression_level)
        .dry_run(cli.dry_run)
        .build(&selection, &output_path, &mut progress)?;

    if let Some(p) = &progress {
        p.finish_all();
    }

    if !cli.quiet {
        println!();
        if cli.dry_run {
            output::success("Dry run complete - no archive was written");
        } else {
            output::success("Backup created successfully");
        }
        println!();
        if !cli.dry_run {
            output::kv("Location", &summary.archive_path.display().to_string());
        }
        output::kv("Files included", &summary.file_count.to_string());
        output::kv(
            "From explicit paths",
            &selection.stats.explicit_includes.to_string(),
        );
        output::kv(
            "Module directories",
            &selection.stats.module_dirs.to_string(),
        );
        output::kv(
            "Skipped (too large)",
            &format!(
                "{} ({} saved)",
                selection.stats.skipped_oversize,
                format_bytes(selection.stats.oversize_bytes)
            ),
        );
        output::kv("Data size", &format_bytes(summary.total_bytes));
        if !cli.dry_run {
            output::kv("Archive size", &format_bytes(summary.archive_bytes));
        }
        output::kv("Duration", &format!("{:.1}s", summary.duration_seconds));

        if selection.stats.unreadable > 0 {
            output::warning(&format!(
                "{} files or directories could not be read and were skipped",
                selection.stats.unreadable
            ));
        }
        if summary.skipped > 0 {
            output::warning(&format!(
                "{} selected files disappeared before archiving",
                summary.skipped
            ));
        }
    }

    if !cli.dry_run && !settings.post_actions.is_empty() {
        if !cli.quiet {
            println!();
            output::info("Running post-backup actions:");
        }
        for outcome in run_post_actions(&settings.post_actions, &summary.archive_path) {
            if outcome.success {
                output::success(&outcome.command);
            } else {
                output::warning(&format!("failed: {}", outcome.command));
            }
        }
    }

    Ok(())
}

/// Build the effective settings: defaults, then the named profile (or the
/// default-marked one), then the CLI flags.
fn resolve_settings(cli: &Cli, store: &ProfileStore) -> Result<EffectiveSettings> {
    let mut settings = EffectiveSettings::defaults();

    if let Some(name) = &cli.use_profile {
        let profile = store.load(name)?;
        if !cli.quiet {
            output::info(&format!("Using profile '{name}'"));
        }
        settings = settings.overlay_profile(&profile);
    } else if let Some(name) = store.default_name() {
        match store.load(&name) {
            Ok(profile) => {
                if !cli.quiet {
                    output::info(&format!("Using default profile '{name}'"));
                }
                settings = settings.overlay_profile(&profile);
            }
            Err(e) => {
                output::warning(&format!("Ignoring stale default profile '{name}': {e}"));
            }
        }
    }

    Ok(settings.overlay_cli(cli)?)
}

/// Resolve the archive path: an explicit file path is used as-is, a
/// directory receives a timestamped archive name, and no output at all
/// means a timestamped archive in the current directory.
fn resolve_output_path(output: Option<PathBuf>) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let default_name = format!("backup-{timestamp}.tar.gz");

    match output {
        Some(path) if path.is_dir() => path.join(default_name),
        Some(path) => path,
        None => PathBuf::from(default_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_output_path_explicit_file() {
        let path = resolve_output_path(Some(PathBuf::from("/backups/out.tar.gz")));
        assert_eq!(path, PathBuf::from("/backups/out.tar.gz"));
    }

    #[test]
    fn test_resolve_output_path_directory() {
        let tmp = TempDir::new().unwrap();
        let path = resolve_output_path(Some(tmp.path().to_path_buf()));
        assert!(path.starts_with(tmp.path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("backup-") && name.ends_with(".tar.gz"));
    }

    #[test]
    fn test_resolve_output_path_default() {
        let path = resolve_output_path(None);
        let name = path.to_string_lossy().into_owned();
        assert!(name.starts_with("backup-") && name.ends_with(".tar.gz"));
    }
}
