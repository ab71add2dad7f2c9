//! Error types for codestash-core

use thiserror::Error;

/// Result type alias using codestash-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for codestash
#[derive(Error, Debug)]
pub enum Error {
    /// Named profile does not exist in the profile store
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    /// Profile name contains characters that cannot be used as a filename
    #[error("Invalid profile name '{name}': {reason}")]
    InvalidProfileName { name: String, reason: String },

    /// Size string could not be parsed
    #[error("Invalid size '{input}': use formats like '20MB' or '1GB'")]
    InvalidSize { input: String },

    /// Exclusion pattern failed to compile
    #[error("Invalid exclusion pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Projects root directory does not exist
    #[error("Projects directory not found: {path}")]
    ProjectsDirNotFound { path: String },

    /// Archive could not be opened or decoded
    #[error("Cannot read archive '{path}': {source}")]
    ArchiveCorrupt {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Destination directory or file could not be created or written
    #[error("Cannot write to '{path}': {source}")]
    DestinationError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A restore filter named only projects absent from the archive
    #[error("None of the requested projects exist in the archive: {names}")]
    ProjectsNotInArchive { names: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl Error {
    /// Create a profile not found error
    pub fn profile_not_found(name: impl Into<String>) -> Self {
        Self::ProfileNotFound { name: name.into() }
    }

    /// Create an invalid profile name error
    pub fn invalid_profile_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProfileName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid size error
    pub fn invalid_size(input: impl Into<String>) -> Self {
        Self::InvalidSize {
            input: input.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a projects directory not found error
    pub fn projects_dir_not_found(path: impl Into<String>) -> Self {
        Self::ProjectsDirNotFound { path: path.into() }
    }

    /// Create an archive corrupt error
    pub fn archive_corrupt(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ArchiveCorrupt {
            path: path.into(),
            source,
        }
    }

    /// Create a destination error
    pub fn destination(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::DestinationError {
            path: path.into(),
            source,
        }
    }

    /// Create a projects-not-in-archive error from the requested names
    pub fn projects_not_in_archive(names: &[String]) -> Self {
        Self::ProjectsNotInArchive {
            names: names.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::profile_not_found("daily");
        assert_eq!(err.to_string(), "Profile not found: daily");

        let err = Error::invalid_size("20XB");
        assert!(err.to_string().contains("20XB"));

        let err = Error::projects_not_in_archive(&["a".to_string(), "b".to_string()]);
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
