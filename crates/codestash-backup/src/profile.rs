//! Named backup profiles and their on-disk store.
//!
//! A profile is a persisted rule set plus the orchestration extras that make
//! a run repeatable: the projects root, the output path, and post-backup
//! actions. Each profile is one JSON file in the profile directory; an
//! optional marker file records which profile applies when none is named.

use crate::rules::RuleSet;
use codestash_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name used by `--create-default-profile`.
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Marker file holding the name of the default profile.
const DEFAULT_MARKER: &str = ".default";

/// A named, persisted backup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Projects root this profile applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<PathBuf>,

    /// Output archive path or directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Selection rules
    pub rules: RuleSet,

    /// Post-backup action templates
    #[serde(default)]
    pub post_actions: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            projects_dir: None,
            output: None,
            rules: RuleSet::default(),
            post_actions: Vec::new(),
        }
    }
}

/// Stores profiles as one JSON file per name under a directory.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Creates a store over the given directory. The directory is created
    /// lazily on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens the store at the user's fixed configuration directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(codestash_core::profiles_dir()?))
    }

    /// Directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists a profile under a name, atomically (temp file + rename).
    pub fn save(&self, name: &str, profile: &Profile) -> Result<()> {
        validate_name(name)?;
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(profile)?;
        let tmp = self.dir.join(format!(".tmp-{name}.json"));
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, self.path_for(name))?;

        tracing::info!("Profile '{}' saved", name);
        Ok(())
    }

    /// Loads a profile by name.
    pub fn load(&self, name: &str) -> Result<Profile> {
        validate_name(name)?;
        let path = self.path_for(name);

        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::profile_not_found(name)
            } else {
                Error::Io(e)
            }
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Sorted names of all stored profiles.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(Error::Io(e)),
        };

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with(".tmp-") {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Marks a stored profile as the default.
    pub fn set_default(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if !self.path_for(name).is_file() {
            return Err(Error::profile_not_found(name));
        }
        std::fs::write(self.dir.join(DEFAULT_MARKER), name)?;
        Ok(())
    }

    /// Name recorded in the default marker, if any.
    pub fn default_name(&self) -> Option<String> {
        let content = std::fs::read_to_string(self.dir.join(DEFAULT_MARKER)).ok()?;
        let name = content.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_profile_name(name, "name is empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::invalid_profile_name(
            name,
            "name must not contain path separators",
        ));
    }
    if name.starts_with('.') {
        return Err(Error::invalid_profile_name(
            name,
            "name must not start with '.'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_profile() -> Profile {
        let mut rules = RuleSet::default();
        rules.exclude_patterns.push("scratch".to_string());
        rules.include_paths.push("api/vendor".to_string());
        rules.include_projects.push("api".to_string());
        rules.exclude_projects.push("sandbox".to_string());
        rules.include_venv = true;
        rules.detect_modules = false;
        rules.max_file_size = 5 * 1024 * 1024;
        rules.compression_level = 3;

        Profile {
            projects_dir: Some(PathBuf::from("/home/dev/projects")),
            output: Some(PathBuf::from("/backups/api.tar.gz")),
            rules,
            post_actions: vec!["echo done {backup_file}".to_string()],
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::new(tmp.path());

        let profile = sample_profile();
        store.save("daily", &profile).unwrap();

        let loaded = store.load("daily").unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_load_missing_profile() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::new(tmp.path());

        let err = store.load("nope").unwrap_err();
        assert!(matches!(err, Error::ProfileNotFound { .. }));
    }

    #[test]
    fn test_list_profiles() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::new(tmp.path());

        assert!(store.list().unwrap().is_empty());

        store.save("weekly", &Profile::default()).unwrap();
        store.save("daily", &Profile::default()).unwrap();

        assert_eq!(store.list().unwrap(), vec!["daily", "weekly"]);
    }

    #[test]
    fn test_list_on_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::new(tmp.path().join("not-created-yet"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_default_marker() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::new(tmp.path());

        assert!(store.default_name().is_none());

        // Cannot mark a profile that does not exist
        assert!(store.set_default("daily").is_err());

        store.save("daily", &Profile::default()).unwrap();
        store.set_default("daily").unwrap();
        assert_eq!(store.default_name().as_deref(), Some("daily"));

        // The marker is not listed as a profile
        assert_eq!(store.list().unwrap(), vec!["daily"]);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::new(tmp.path());

        for bad in ["", "a/b", "a\\b", ".", "..", ".hidden"] {
            assert!(
                store.save(bad, &Profile::default()).is_err(),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_overwrite_updates_profile() {
        let tmp = TempDir::new().unwrap();
        let store = ProfileStore::new(tmp.path());

        store.save("daily", &Profile::default()).unwrap();
        let updated = sample_profile();
        store.save("daily", &updated).unwrap();

        assert_eq!(store.load("daily").unwrap(), updated);
        assert_eq!(store.list().unwrap(), vec!["daily"]);
    }
}
