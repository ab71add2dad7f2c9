//! Profile commands: list profiles, create the default profile.

use crate::cli::Cli;
use crate::output;
use crate::settings::EffectiveSettings;
use anyhow::Result;
use codestash_backup::{ProfileStore, DEFAULT_PROFILE_NAME};
use codestash_core::{format_bytes, Error};
use console::style;

/// `--list-profiles`
pub fn list(_cli: &Cli) -> Result<()> {
    let store = ProfileStore::open_default()?;
    let names = store.list()?;

    if names.is_empty() {
        output::info("No backup profiles found");
        return Ok(());
    }

    let default = store.default_name();

    output::header("Backup Profiles");
    for name in names {
        let marker = if default.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("  {}{}", style(&name).green(), style(marker).dim());

        match store.load(&name) {
            Ok(profile) => {
                output::item(&format!(
                    "max size {}, compression {}, venv {}",
                    format_bytes(profile.rules.max_file_size),
                    profile.rules.compression_level,
                    if profile.rules.include_venv { "on" } else { "off" },
                ));
                if let Some(dir) = &profile.projects_dir {
                    output::item(&format!("projects root {}", dir.display()));
                }
                if !profile.rules.include_projects.is_empty() {
                    output::item(&format!(
                        "projects: {}",
                        profile.rules.include_projects.join(", ")
                    ));
                }
                if !profile.post_actions.is_empty() {
                    output::item(&format!("{} post-action(s)", profile.post_actions.len()));
                }
            }
            Err(e) => {
                output::item(&format!("unreadable: {e}"));
            }
        }
        println!();
    }

    Ok(())
}

/// `--create-default-profile`: capture the current settings plus every
/// project under the root, save as 'default', and mark it as the default.
pub fn create_default(cli: &Cli) -> Result<()> {
    let store = ProfileStore::open_default()?;
    let settings = EffectiveSettings::defaults().overlay_cli(cli)?;

    let projects_root = settings.resolve_projects_dir();
    if !projects_root.is_dir() {
        return Err(Error::projects_dir_not_found(projects_root.display().to_string()).into());
    }

    let mut project_names = Vec::new();
    for entry in std::fs::read_dir(&projects_root)? {
        let entry = entry?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                project_names.push(name.to_string());
            }
        }
    }
    project_names.sort();

    let mut profile = settings.to_profile();
    profile.projects_dir = Some(projects_root.clone());
    profile.rules.include_projects = project_names;

    store.save(DEFAULT_PROFILE_NAME, &profile)?;
    store.set_default(DEFAULT_PROFILE_NAME)?;

    output::success(&format!("Default profile '{DEFAULT_PROFILE_NAME}' created"));
    output::kv(
        "Profile file",
        &store
            .dir()
            .join(format!("{DEFAULT_PROFILE_NAME}.json"))
            .display()
            .to_string(),
    );
    output::kv(
        "Projects",
        &profile.rules.include_projects.len().to_string(),
    );

    Ok(())
}
