//! Engine configuration file support.
//!
//! This module reads tuning knobs and boundary limits from a TOML file and
//! lets a handful of environment variables override them.
//!
//! ```toml
//! [windows]
//! top_k = 3
//! min_window_minutes = 60
//!
//! [limits]
//! max_total_slots = 1000
//! max_day_count = 30
//! submissions_per_minute = 10
//!
//! [pulse]
//! bucket_count = 5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Environment variable overriding `windows.top_k`.
pub const ENV_TOP_WINDOWS: &str = "HUDDLE_TOP_WINDOWS";
/// Environment variable overriding `limits.submissions_per_minute`.
pub const ENV_RATE_LIMIT: &str = "HUDDLE_RATE_LIMIT_PER_MINUTE";
/// Environment variable overriding `limits.max_total_slots`.
pub const ENV_MAX_TOTAL_SLOTS: &str = "HUDDLE_MAX_TOTAL_SLOTS";

/// Engine configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub windows: WindowSettings,
    #[serde(default)]
    pub limits: LimitsSettings,
    #[serde(default)]
    pub pulse: PulseSettings,
}

/// Best-window search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_window_minutes")]
    pub min_window_minutes: u32,
}

/// Limits enforced by the boundary before data reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsSettings {
    #[serde(default = "default_max_total_slots")]
    pub max_total_slots: usize,
    #[serde(default = "default_max_day_count")]
    pub max_day_count: u32,
    #[serde(default = "default_submissions_per_minute")]
    pub submissions_per_minute: u32,
}

/// Pulse summary settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseSettings {
    #[serde(default = "default_bucket_count")]
    pub bucket_count: usize,
}

fn default_top_k() -> usize {
    3
}

fn default_min_window_minutes() -> u32 {
    60
}

fn default_max_total_slots() -> usize {
    1000
}

fn default_max_day_count() -> u32 {
    30
}

fn default_submissions_per_minute() -> u32 {
    10
}

fn default_bucket_count() -> usize {
    5
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_window_minutes: default_min_window_minutes(),
        }
    }
}

impl Default for LimitsSettings {
    fn default() -> Self {
        Self {
            max_total_slots: default_max_total_slots(),
            max_day_count: default_max_day_count(),
            submissions_per_minute: default_submissions_per_minute(),
        }
    }
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            bucket_count: default_bucket_count(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| EngineError::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if successful
    /// * `Err(EngineError::Configuration)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `huddle.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self> {
        let search_paths = [
            PathBuf::from("huddle.toml"),
            PathBuf::from("backend/huddle.toml"),
            PathBuf::from("../huddle.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::debug!("Loading engine config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(EngineError::Configuration(
            "No huddle.toml found in standard locations".to_string(),
        ))
    }

    /// Configuration from the default location, falling back to defaults when
    /// no file exists, with environment overrides applied.
    pub fn load() -> Result<Self> {
        let config = match Self::from_default_location() {
            Ok(config) => config,
            Err(EngineError::Configuration(msg)) if msg.starts_with("No huddle.toml") => {
                log::debug!("{}, using defaults", msg);
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an environment lookup function.
    ///
    /// Taking the lookup as a parameter keeps tests free of process-global
    /// environment mutation.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_TOP_WINDOWS) {
            self.windows.top_k = parse_env(ENV_TOP_WINDOWS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RATE_LIMIT) {
            self.limits.submissions_per_minute = parse_env(ENV_RATE_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_TOTAL_SLOTS) {
            self.limits.max_total_slots = parse_env(ENV_MAX_TOTAL_SLOTS, &raw)?;
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| EngineError::Configuration(format!("{} has invalid value '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.windows.top_k, 3);
        assert_eq!(config.windows.min_window_minutes, 60);
        assert_eq!(config.limits.max_total_slots, 1000);
        assert_eq!(config.limits.max_day_count, 30);
        assert_eq!(config.limits.submissions_per_minute, 10);
        assert_eq!(config.pulse.bucket_count, 5);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[windows]
top_k = 5

[pulse]
bucket_count = 10
"#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.windows.top_k, 5);
        assert_eq!(config.windows.min_window_minutes, 60);
        assert_eq!(config.limits, LimitsSettings::default());
        assert_eq!(config.pulse.bucket_count, 10);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = EngineConfig::from_toml_str("[windows]\ntop_k = \"three\"");
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nsubmissions_per_minute = 4").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.limits.submissions_per_minute, 4);
        assert_eq!(config.limits.max_total_slots, 1000);
    }

    #[test]
    fn test_from_missing_file() {
        let result = EngineConfig::from_file("/definitely/not/here/huddle.toml");
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_TOP_WINDOWS, "7"), (ENV_RATE_LIMIT, " 20 ")]
            .into_iter()
            .collect();

        let config = EngineConfig::default()
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.windows.top_k, 7);
        assert_eq!(config.limits.submissions_per_minute, 20);
        assert_eq!(config.limits.max_total_slots, 1000);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let result = EngineConfig::default().apply_env_overrides(|key| {
            (key == ENV_MAX_TOTAL_SLOTS).then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }
}
