//! Application settings and paths.
//!
//! Settings supply defaults for the scan flags. They live in a JSON file in
//! the XDG config directory, or at a path given with `--config`.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{DEFAULT_PORTS, DEFAULT_THREADS, DEFAULT_TIMEOUT_SECS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Returns `None` when the platform
    /// reports no home directory.
    pub fn discover() -> Option<Self> {
        let project = ProjectDirs::from("com", "portsweep", "portsweep")?;
        Some(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default port range expression.
    pub default_ports: String,
    /// Default concurrency level.
    pub default_threads: usize,
    /// Default timeout in seconds.
    pub default_timeout_secs: f64,
    /// Default output format for `--output`.
    pub default_format: String,
    /// Show the progress bar by default.
    pub progress: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_ports: DEFAULT_PORTS.to_string(),
            default_threads: DEFAULT_THREADS,
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_format: "json".to_string(),
            progress: false,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file
    /// is reported and also yields the defaults, so a stray settings file
    /// never blocks a scan.
    pub fn load() -> Self {
        let Some(file) = Paths::discover().map(|p| p.settings_file()) else {
            return Self::default();
        };

        if !file.exists() {
            return Self::default();
        }

        match Self::load_from(&file) {
            Ok(settings) => {
                debug!("loaded settings from {}", file.display());
                settings
            }
            Err(e) => {
                warn!("ignoring settings file: {e}");
                Self::default()
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_ports, "1-1024");
        assert_eq!(settings.default_threads, 10);
        assert_eq!(settings.default_timeout_secs, 2.0);
        assert_eq!(settings.default_format, "json");
    }

    #[test]
    fn test_settings_serialization() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_threads": 64, "default_format": "csv" }}"#).unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.default_threads, 64);
        assert_eq!(settings.default_format, "csv");
        assert_eq!(settings.default_ports, "1-1024");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            AppSettings::load_from(file.path()),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("settings.json");
        assert!(matches!(
            AppSettings::load_from(&missing),
            Err(ConfigError::ReadFailed { .. })
        ));
    }
}
