//! Shared configuration for the netseg tools.
//!
//! TOML profiles naming a policy snapshot file, layered with environment
//! overrides, and translation of profile settings into
//! `netseg_core::SearchLimits`. The CLI adds `GlobalOpts`-aware wrappers
//! on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netseg_core::SearchLimits;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no snapshot configured for profile '{profile}'")]
    NoSnapshot { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named snapshot profiles, kept sorted for stable `config show`.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Cap on segments dequeued per breadth-first search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_visits: Option<usize>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            max_visits: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named snapshot profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Snapshot file (JSON, YAML or TOML).
    pub snapshot: PathBuf,

    /// Override the global visit cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_visits: Option<usize>,
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }

    /// Visit cap for `profile`, falling back to `[defaults]`.
    pub fn search_limits(&self, profile: Option<&Profile>) -> SearchLimits {
        SearchLimits {
            max_visits: profile
                .and_then(|p| p.max_visits)
                .or(self.defaults.max_visits),
        }
    }

    /// Point `default_profile` at an existing profile.
    pub fn set_default_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        self.profile(name)?;
        self.default_profile = Some(name.into());
        Ok(())
    }

    /// Insert or replace a profile. A snapshot path that is empty is rejected.
    pub fn upsert_profile(&mut self, name: &str, profile: Profile) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "profile".into(),
                reason: "name must not be empty".into(),
            });
        }
        if profile.snapshot.as_os_str().is_empty() {
            return Err(ConfigError::NoSnapshot {
                profile: name.into(),
            });
        }
        if profile.max_visits == Some(0) {
            return Err(ConfigError::Validation {
                field: "max_visits".into(),
                reason: "must be at least 1".into(),
            });
        }
        self.profiles.insert(name.into(), profile);
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netseg", "netseg").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netseg");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, still layering `NETSEG_*` env vars.
///
/// Nested keys use a double underscore: `NETSEG_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETSEG_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
