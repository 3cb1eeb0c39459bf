//! TOML-based configuration persistence for the devlink client.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\DevLink\config.toml`
//! - Linux:    `~/.config/devlink/config.toml`
//! - macOS:    `~/Library/Application Support/DevLink/config.toml`
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return
//! value of `some_fn()` when the field is absent from the TOML file.  This
//! allows the app to work correctly on first run (before a config file
//! exists) and when upgrading from an older config file that is missing
//! newer fields.
//!
//! # Strict filter parsing
//!
//! The discovery section stores filter clauses as lists of names
//! (`system_kinds = ["Desktop", "Phone"]`).  Conversion to a
//! [`DiscoveryFilter`] is strict: an unrecognized name is a
//! [`ConfigError::FilterInvalid`], never a silent match-everything filter.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use devlink_core::{DiscoveryFilter, DiscoveryType, ParseEnumError, SystemKind};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A discovery filter clause names an unknown kind or type.
    #[error("invalid discovery filter in config: {0}")]
    FilterInvalid(#[from] ParseEnumError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

/// Identity-service registration and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformConfig {
    /// Client id assigned when the app was registered with the identity
    /// service.
    #[serde(default)]
    pub client_id: String,
    /// Authorize endpoint the interactive auth flow starts at.
    #[serde(default = "default_authorize_endpoint")]
    pub authorize_endpoint: String,
    /// Redirect the auth flow lands on; the auth code is read off its
    /// query string.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Saved refresh token from a previous run.  When present, the
    /// interactive auth flow is skipped entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl PlatformConfig {
    /// The full authorize URL the auth provider is asked to drive.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code",
            self.authorize_endpoint, self.client_id, self.redirect_uri
        )
    }
}

/// Discovery filter clauses, stored as name lists.
///
/// An absent list means "match any"; an empty list means "match none" —
/// the same semantics the in-memory [`DiscoveryFilter`] uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscoveryConfig {
    /// Discovery-type names, e.g. `["Cloud"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery_types: Option<Vec<String>>,
    /// System-kind names, e.g. `["Desktop", "Phone"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_kinds: Option<Vec<String>>,
}

impl DiscoveryConfig {
    /// Parses the name lists into a [`DiscoveryFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FilterInvalid`] on the first unrecognized
    /// name.
    pub fn to_filter(&self) -> Result<DiscoveryFilter, ConfigError> {
        let mut filter = DiscoveryFilter::any();
        if let Some(names) = &self.discovery_types {
            let types = names
                .iter()
                .map(|name| DiscoveryType::from_str(name))
                .collect::<Result<Vec<_>, _>>()?;
            filter = filter.with_discovery_types(types);
        }
        if let Some(names) = &self.system_kinds {
            let kinds = names
                .iter()
                .map(|name| SystemKind::from_str(name))
                .collect::<Result<Vec<_>, _>>()?;
            filter = filter.with_system_kinds(kinds);
        }
        Ok(filter)
    }
}

/// Launch presets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchConfig {
    /// URIs offered to the user as launch presets.
    #[serde(default = "default_uris")]
    pub default_uris: Vec<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_authorize_endpoint() -> String {
    "https://login.example.com/oauth20_authorize.srf".to_string()
}
fn default_redirect_uri() -> String {
    "https://login.example.com/oauth20_desktop.srf".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_uris() -> Vec<String> {
    vec![
        "https://www.rust-lang.org".to_string(),
        "https://en.wikipedia.org".to_string(),
        "mailto:someone@example.com".to_string(),
    ]
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            authorize_endpoint: default_authorize_endpoint(),
            redirect_uri: default_redirect_uri(),
            refresh_token: None,
            log_level: default_log_level(),
        }
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            default_uris: default_uris(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory
/// cannot be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from disk, returning `AppConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to disk.
///
/// Creates the config directory and file if they do not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    // Ensure directory exists before writing.
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("DevLink"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("devlink"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("DevLink")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
