//! User configuration for redpen.
//!
//! Read from `$XDG_CONFIG_HOME/redpen/config.toml` (falling back to
//! `~/.config/redpen/config.toml`). Every key is optional. A missing file is
//! silent; a malformed file logs a warning and yields the defaults, so config
//! problems never stop the editor from starting.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
/// The availability indicator is refreshed no faster and no slower than this.
pub const STATUS_POLL_RANGE_SECS: (u64, u64) = (30, 60);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the analysis service; `/api/analyze` is appended.
    pub api_url: String,
    /// `catppuccin-mocha` or `dark`.
    pub theme: String,
    pub status_poll_secs: u64,
    pub request_timeout_secs: u64,
    /// Idle time after the last keystroke before a draft is committed.
    pub commit_idle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            theme: "catppuccin-mocha".to_owned(),
            status_poll_secs: 30,
            request_timeout_secs: 30,
            commit_idle_ms: 750,
        }
    }
}

impl Config {
    /// Loads the config from the default location and applies env overrides.
    pub fn load() -> Self {
        let mut config = Self::from_path(&config_path());
        if let Ok(url) = std::env::var("REDPEN_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        config
    }

    /// Reads `path`, falling back to defaults on any error.
    pub fn from_path(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(
                    target: "config",
                    path = %path.display(),
                    error = %e,
                    "could not read config"
                );
                return Self::default();
            }
        };
        match toml::from_str::<Config>(&raw) {
            Ok(config) => {
                tracing::info!(target: "config", path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(
                    target: "config",
                    path = %path.display(),
                    error = %e,
                    "config parse error; using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn status_poll_interval(&self) -> Duration {
        let (lo, hi) = STATUS_POLL_RANGE_SECS;
        Duration::from_secs(self.status_poll_secs.clamp(lo, hi))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn commit_idle(&self) -> Duration {
        Duration::from_millis(self.commit_idle_ms)
    }
}

/// Returns `$XDG_CONFIG_HOME/redpen`, or `~/.config/redpen` when unset.
fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("redpen")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Directory for `redpen.log`: `$XDG_STATE_HOME/redpen`, or `~/.local/state/redpen`.
pub fn state_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".local").join("state"))
        })
        .unwrap_or_else(|| PathBuf::from(".redpen"))
        .join("redpen")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::from_path(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let toml = "api_url = \"http://analysis.local:9000\"\nstatus_poll_secs = 5\n";
        std::fs::write(&path, toml).unwrap();

        let config = Config::from_path(&path);

        assert_eq!(config.api_url, "http://analysis.local:9000");
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(
            config.status_poll_interval(),
            Duration::from_secs(30),
            "poll interval is clamped"
        );
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [not toml").unwrap();
        assert_eq!(Config::from_path(&path), Config::default());

        std::fs::write(&path, "colour = \"red\"").unwrap();
        assert_eq!(Config::from_path(&path), Config::default(), "unknown keys are rejected");
    }
}
