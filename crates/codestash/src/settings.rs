//! Layered resolution of the effective backup settings.
//!
//! Settings are built by successive overlays on an immutable struct:
//! hard-coded defaults, then the profile (when one applies), then the
//! explicitly supplied CLI flags. Later stages override earlier ones.

use crate::cli::Cli;
use codestash_backup::{Profile, RuleSet};
use codestash_core::{parse_size, Result};
use std::path::PathBuf;

/// The fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSettings {
    pub projects_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub rules: RuleSet,
    pub post_actions: Vec<String>,
}

impl EffectiveSettings {
    /// The hard-coded defaults, before any profile or flag applies.
    pub fn defaults() -> Self {
        Self {
            projects_dir: None,
            output: None,
            rules: RuleSet::default(),
            post_actions: Vec::new(),
        }
    }

    /// Overlay a loaded profile. The profile's rule set replaces the
    /// defaults wholesale; optional fields apply only when set.
    pub fn overlay_profile(mut self, profile: &Profile) -> Self {
        if profile.projects_dir.is_some() {
            self.projects_dir = profile.projects_dir.clone();
        }
        if profile.output.is_some() {
            self.output = profile.output.clone();
        }
        self.rules = profile.rules.clone();
        self.post_actions = profile.post_actions.clone();
        self
    }

    /// Overlay the CLI flags the user explicitly supplied.
    pub fn overlay_cli(mut self, cli: &Cli) -> Result<Self> {
        if let Some(dir) = &cli.projects_dir {
            self.projects_dir = Some(dir.as_std_path().to_path_buf());
        }
        if let Some(output) = &cli.output {
            self.output = Some(output.as_std_path().to_path_buf());
        }

        if cli.include_venv {
            self.rules.include_venv = true;
        }
        if cli.no_auto_modules {
            self.rules.detect_modules = false;
        }
        if !cli.exclude.is_empty() {
            self.rules.exclude_patterns = cli.exclude.clone();
        }
        if !cli.include.is_empty() {
            self.rules.include_paths = cli.include.clone();
        }
        if !cli.exclude_paths.is_empty() {
            self.rules.exclude_paths = cli.exclude_paths.clone();
        }
        if !cli.include_projects.is_empty() {
            self.rules.include_projects = cli.include_projects.clone();
        }
        if !cli.exclude_projects.is_empty() {
            self.rules.exclude_projects = cli.exclude_projects.clone();
        }
        if let Some(size) = &cli.max_size {
            self.rules.max_file_size = parse_size(size)?;
        }
        if let Some(level) = cli.compression {
            self.rules.compression_level = level;
        }
        if !cli.post_actions.is_empty() {
            self.post_actions = cli.post_actions.clone();
        }

        Ok(self)
    }

    /// The projects root, falling back to $CODESTASH_PROJECTS and then the
    /// current directory.
    pub fn resolve_projects_dir(&self) -> PathBuf {
        if let Some(dir) = &self.projects_dir {
            return dir.clone();
        }
        if let Ok(dir) = std::env::var("CODESTASH_PROJECTS") {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        PathBuf::from(".")
    }

    /// Capture the current settings as a profile for persistence.
    pub fn to_profile(&self) -> Profile {
        Profile {
            projects_dir: self.projects_dir.clone(),
            output: self.output.clone(),
            rules: self.rules.clone(),
            post_actions: self.post_actions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["codestash"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    fn sample_profile() -> Profile {
        let mut rules = RuleSet::default();
        rules.max_file_size = 1024;
        rules.compression_level = 3;
        rules.include_projects.push("api".to_string());
        Profile {
            projects_dir: Some(PathBuf::from("/profile/projects")),
            output: Some(PathBuf::from("/profile/out.tar.gz")),
            rules,
            post_actions: vec!["echo profile".to_string()],
        }
    }

    #[test]
    fn test_defaults() {
        let settings = EffectiveSettings::defaults();
        assert!(settings.projects_dir.is_none());
        assert_eq!(settings.rules, RuleSet::default());
    }

    #[test]
    fn test_profile_overrides_defaults() {
        let settings = EffectiveSettings::defaults().overlay_profile(&sample_profile());

        assert_eq!(
            settings.projects_dir.as_deref(),
            Some(std::path::Path::new("/profile/projects"))
        );
        assert_eq!(settings.rules.max_file_size, 1024);
        assert_eq!(settings.rules.compression_level, 3);
        assert_eq!(settings.post_actions, vec!["echo profile"]);
    }

    #[test]
    fn test_cli_overrides_profile() {
        let settings = EffectiveSettings::defaults()
            .overlay_profile(&sample_profile())
            .overlay_cli(&cli(&[
                "-p",
                "/cli/projects",
                "-m",
                "2KB",
                "--include-projects",
                "web",
            ]))
            .unwrap();

        assert_eq!(
            settings.projects_dir.as_deref(),
            Some(std::path::Path::new("/cli/projects"))
        );
        assert_eq!(settings.rules.max_file_size, 2048);
        assert_eq!(settings.rules.include_projects, vec!["web"]);
        // Untouched profile fields survive
        assert_eq!(settings.rules.compression_level, 3);
        assert_eq!(settings.output.as_deref(), Some(std::path::Path::new("/profile/out.tar.gz")));
    }

    #[test]
    fn test_unset_cli_flags_do_not_override() {
        let settings = EffectiveSettings::defaults()
            .overlay_profile(&sample_profile())
            .overlay_cli(&cli(&[]))
            .unwrap();

        assert_eq!(settings.rules.max_file_size, 1024);
        assert_eq!(settings.rules.include_projects, vec!["api"]);
        assert_eq!(settings.post_actions, vec!["echo profile"]);
    }

    #[test]
    fn test_bad_size_is_rejected() {
        let result = EffectiveSettings::defaults().overlay_cli(&cli(&["-m", "lots"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_to_profile_round_trip() {
        let settings = EffectiveSettings::defaults()
            .overlay_cli(&cli(&["-p", "/p", "-o", "/o.tar.gz", "-e", "scratch"]))
            .unwrap();

        let profile = settings.to_profile();
        let back = EffectiveSettings::defaults().overlay_profile(&profile);
        assert_eq!(back, settings);
    }
}
