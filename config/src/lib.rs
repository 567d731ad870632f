//! Configuration for stage navigation.
//!
//! Read from `~/.stage/config.toml`. Every section is optional; a missing or
//! unreadable file yields defaults so navigation never blocks on config.
//!
//! ```toml
//! [transitions]
//! open_ms = 300
//! close_ms = 250
//! reduced_motion = false
//!
//! [launch_modes]
//! "gallery.list" = "single_top"
//! "gallery.detail" = "standard"
//!
//! [persistence]
//! snapshot_dir = "${XDG_STATE_HOME}/stage"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use stage_types::LaunchMode;

const DEFAULT_OPEN_MS: u64 = 300;
const DEFAULT_CLOSE_MS: u64 = 250;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub transitions: TransitionConfig,
    /// Launch mode overrides keyed by scene type name.
    #[serde(default)]
    pub launch_modes: BTreeMap<String, LaunchMode>,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub open_ms: u64,
    pub close_ms: u64,
    /// Replace every canned animation with an instant switch.
    pub reduced_motion: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            open_ms: DEFAULT_OPEN_MS,
            close_ms: DEFAULT_CLOSE_MS,
            reduced_motion: false,
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub fn open_duration(&self) -> Duration {
        Duration::from_millis(self.open_ms)
    }

    #[must_use]
    pub fn close_duration(&self) -> Duration {
        Duration::from_millis(self.close_ms)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PersistenceConfig {
    pub snapshot_dir: Option<String>,
}

impl PersistenceConfig {
    /// Snapshot directory with `${VAR}` references expanded.
    #[must_use]
    pub fn snapshot_dir(&self) -> Option<PathBuf> {
        let raw = self.snapshot_dir.as_deref()?;
        let expanded = expand_env_vars(raw);
        if expanded.trim().is_empty() {
            return None;
        }
        Some(PathBuf::from(expanded))
    }
}

/// Replace `${VAR}` with the value of the environment variable (empty if unset).
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

impl StageConfig {
    /// Load from the default location; `None` if absent or invalid.
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {}: {err}", path.display());
                return None;
            }
        };

        match Self::parse(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {}: {err}", path.display());
                None
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".stage").join("config.toml"))
}
