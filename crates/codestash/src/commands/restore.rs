//! Restore command: extract selected projects from a backup archive.

use crate::cli::Cli;
use crate::output;
use anyhow::{Context, Result};
use codestash_backup::{RestoreProgress, Restorer};

pub fn run(cli: &Cli) -> Result<()> {
    let archive = cli
        .restore
        .as_ref()
        .context("--restore requires an archive path")?;
    let extract_dir = cli
        .extract_dir
        .as_ref()
        .context("--extract-dir is required with --restore")?;

    if !cli.quiet {
        output::header("Restore Backup");
        output::kv("Archive", archive.as_str());
        output::kv("Extract to", extract_dir.as_str());
        if !cli.restore_projects.is_empty() {
            output::kv("Projects", &cli.restore_projects.join(", "));
        }

        let spinner = output::spinner("Analyzing archive...");
        let available = Restorer::projects_in_archive(archive.as_std_path())?;
        spinner.finish_and_clear();
        output::kv(
            "Archive contains",
            &available.into_iter().collect::<Vec<_>>().join(", "),
        );
        println!();
    }

    let mut progress = if cli.quiet {
        None
    } else {
        Some(RestoreProgress::new())
    };

    let report = Restorer::new(cli.restore_projects.clone()).restore(
        archive.as_std_path(),
        extract_dir.as_std_path(),
        &mut progress,
    )?;

    if !cli.quiet {
        println!();
        output::success("Restore completed successfully");
        println!();
        output::kv("Projects", &report.projects.join(", "));
        output::kv("Files restored", &report.restored.to_string());
        if report.skipped > 0 {
            output::kv("Entries skipped", &report.skipped.to_string());
        }
    }

    Ok(())
}
