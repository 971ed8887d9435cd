//! Application settings and paths.
//!
//! Settings live in a JSON file under the XDG config directory
//! (`~/.config/lookout/settings.json` on Linux). Every field is optional in
//! the file; missing fields take the built-in defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/lookout)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory without creating it.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("", "", "lookout").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
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
    /// Default maximum of concurrent probes.
    pub default_concurrency: usize,
    /// Default per-operation scan timeout in seconds.
    pub default_timeout_secs: f64,
    /// Default timeout for the header probe in seconds.
    pub header_timeout_secs: f64,
    /// Default output format.
    pub default_output_format: OutputFormat,
    /// Connection attempts per second, 0 for unlimited.
    pub rate_limit: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_concurrency: 200,
            default_timeout_secs: 1.5,
            header_timeout_secs: 2.0,
            default_output_format: OutputFormat::Plain,
            rate_limit: 0,
        }
    }
}

impl AppSettings {
    /// Load settings from `explicit` if given, otherwise from the default
    /// location. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let file = Paths::discover()?.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Reject values a scan cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_concurrency == 0 {
            return Err(ConfigError::InvalidFormat(
                "default_concurrency must be at least 1".to_string(),
            ));
        }
        for (name, secs) in [
            ("default_timeout_secs", self.default_timeout_secs),
            ("header_timeout_secs", self.header_timeout_secs),
        ] {
            if seconds_to_duration(secs).is_none() {
                return Err(ConfigError::InvalidFormat(format!(
                    "{} must be a positive number of seconds",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Convert a user-supplied number of seconds into a timeout.
///
/// Returns `None` unless the value is finite and strictly positive.
pub fn seconds_to_duration(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}
