//! Console configuration.
//!
//! Settings are read from `<config_dir>/campus-console/config.json` and then
//! overridden by environment variables:
//! - `CAMPUS_API_URL` - API base URL (default: `http://localhost:8000`)
//! - `CAMPUS_STORAGE_PATH` - Session storage file
//! - `CAMPUS_NOTIFICATION_TTL_MS` - Notification lifetime in milliseconds
//! - `CAMPUS_REQUEST_TIMEOUT_SECS` - Per-request timeout (unset: no timeout)

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "campus-console";
const CONFIG_FILE: &str = "config.json";

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://localhost:8000";

/// How long a notification stays visible unless dismissed.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the platform API, without the `/api` prefix.
    pub base_url: String,
    /// Session storage file. `None` uses the platform data directory.
    pub storage_path: Option<PathBuf>,
    /// Notification lifetime in milliseconds.
    pub notification_ttl_ms: u64,
    /// Per-request timeout in seconds. `None` lets requests hang.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            storage_path: None,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL.as_millis() as u64,
            request_timeout_secs: None,
        }
    }
}

impl ConsoleConfig {
    /// Create a config pointing at `base_url` with defaults for the rest.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Where the config file lives, or `None` on platforms without a config
    /// directory.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Load the config file (defaults if missing or unreadable), then apply
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// The saved settings alone, without environment overrides.
    pub fn load_file() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("No config directory on this platform, using defaults");
            return Self::default();
        };
        Self::read_from(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring config at {}: {:#}", path.display(), e);
            Self::default()
        })
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn read_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json)
                .with_context(|| format!("{} is not a valid console config", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Write settings to `path`, creating its directory when needed.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CAMPUS_API_URL").filter(|s| !s.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(path) = lookup("CAMPUS_STORAGE_PATH").filter(|s| !s.trim().is_empty()) {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(ttl) = lookup("CAMPUS_NOTIFICATION_TTL_MS").and_then(|s| s.parse().ok()) {
            self.notification_ttl_ms = ttl;
        }
        if let Some(secs) = lookup("CAMPUS_REQUEST_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.request_timeout_secs = Some(secs);
        }
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
