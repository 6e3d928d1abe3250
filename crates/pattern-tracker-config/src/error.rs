//! Error types for settings operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving, or applying settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A setting is out of bounds
    #[error("invalid settings: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::ReadFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use std::error::Error;

    fn mock_io_err(kind: std::io::ErrorKind) -> std::io::Error {
        std::io::Error::new(kind, "mock")
    }

    #[test]
    fn read_file_display() {
        let err = ConfigError::read_file("/a/settings.toml", mock_io_err(std::io::ErrorKind::NotFound));
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/settings.toml"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn write_file_and_create_dir_display() {
        let err = ConfigError::write_file("/a/b.toml", mock_io_err(std::io::ErrorKind::PermissionDenied));
        assert!(err.to_string().starts_with("failed to write file '/a/b.toml'"));

        let err = ConfigError::create_dir("/a", mock_io_err(std::io::ErrorKind::PermissionDenied));
        assert!(err.to_string().starts_with("failed to create directory '/a'"));
    }

    #[test]
    fn not_found_detection() {
        assert!(ConfigError::read_file("/x", mock_io_err(std::io::ErrorKind::NotFound)).is_not_found());
        assert!(!ConfigError::read_file("/x", mock_io_err(std::io::ErrorKind::PermissionDenied)).is_not_found());
        assert!(!ConfigError::write_file("/x", mock_io_err(std::io::ErrorKind::NotFound)).is_not_found());
    }

    #[test]
    fn validation_display() {
        let err = ConfigError::from(ValidationError::EmptyName {
            field: "devices_group",
        });
        assert_eq!(err.to_string(), "invalid settings: 'devices_group' must not be empty");
        assert!(err.source().is_some());
    }
}
