//! Default settings loaded from TOML.
//!
//! Configuration supplies the defaults applied when a tool call leaves an
//! argument out, plus a few limits and the log level.
//!
//! # Configuration File Format
//!
//! ```toml
//! [extract]
//! conflict_resolution = "rename"
//! recursive = true
//! flatten = false
//! max_rename_attempts = 10000
//!
//! [list]
//! recursive = false
//!
//! [organize]
//! organize_by = "extension"
//!
//! [report]
//! max_failures = 20
//!
//! [logging]
//! level = "info"
//! ```

use crate::category::OrganizeBy;
use crate::conflict::{ConflictPolicy, DEFAULT_MAX_RENAME_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".filextractrc.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration in {}: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// All configurable defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extract: ExtractDefaults,
    pub list: ListDefaults,
    pub organize: OrganizeDefaults,
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractDefaults {
    pub conflict_resolution: ConflictPolicy,
    pub recursive: bool,
    /// Place every file directly in the target root.
    pub flatten: bool,
    /// Upper bound on `name_N` probes under the rename policy.
    pub max_rename_attempts: usize,
}

impl Default for ExtractDefaults {
    fn default() -> Self {
        Self {
            conflict_resolution: ConflictPolicy::Rename,
            recursive: true,
            flatten: false,
            max_rename_attempts: DEFAULT_MAX_RENAME_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListDefaults {
    pub recursive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeDefaults {
    pub organize_by: OrganizeBy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Failing paths included in a result payload; the error count is always complete.
    pub max_failures: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self { max_failures: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.filextractrc.toml` in the current directory
    /// 3. Look for `~/.config/filextract/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file cannot be read, or if
    /// any file found is not valid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("filextract")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&content).map_err(|reason| ConfigError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses settings from TOML text; missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.extract.conflict_resolution, ConflictPolicy::Rename);
        assert!(settings.extract.recursive);
        assert!(!settings.extract.flatten);
        assert_eq!(settings.extract.max_rename_attempts, 10_000);
        assert!(!settings.list.recursive);
        assert_eq!(settings.organize.organize_by, OrganizeBy::Extension);
        assert_eq!(settings.report.max_failures, 20);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [extract]
            conflict_resolution = "skip"

            [organize]
            organize_by = "size"
            "#,
        )
        .unwrap();

        assert_eq!(settings.extract.conflict_resolution, ConflictPolicy::Skip);
        assert!(settings.extract.recursive);
        assert_eq!(settings.organize.organize_by, OrganizeBy::Size);
        assert_eq!(settings.report.max_failures, 20);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = Settings::from_toml("[extract]\nconflict_resolution = \"merge\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[report]\nmax_failures = 3\n").unwrap();

        let settings = Settings::load(Some(&path)).expect("Failed to load config");
        assert_eq!(settings.report.max_failures, 3);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Settings::load(Some(&temp_dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[extract\nrecursive = ").unwrap();

        let result = Settings::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ConfigInvalid { .. })));
    }
}
