//! Shared configuration for siteview.
//!
//! TOML defaults and site aliases, layered with `SITEVIEW_*` environment
//! variables, and translation to `siteview_core::AnalyzerConfig`. The CLI
//! adds `GlobalOpts`-aware overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use siteview_core::{AnalyzerConfig, TlsVerification, normalize};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no site alias named '{name}'")]
    UnknownSite { name: String },

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
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named site aliases: `docs = "https://docs.example.com"`.
    #[serde(default)]
    pub sites: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Path to a custom CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override the `User-Agent` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            ca_cert: None,
            user_agent: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Resolve a site alias, or return the input unchanged.
    pub fn resolve_site<'a>(&'a self, input: &'a str) -> &'a str {
        self.sites.get(input.trim()).map_or(input, String::as_str)
    }

    /// Add or replace a site alias. The URL must normalize.
    pub fn set_site(&mut self, name: &str, url: &str) -> Result<(), ConfigError> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '.', ':']) {
            return Err(ConfigError::Validation {
                field: "site name".into(),
                reason: format!("'{name}' must be a bare word (no '/', '.' or ':')"),
            });
        }
        normalize(url).map_err(|e| ConfigError::Validation {
            field: "site url".into(),
            reason: e.to_string(),
        })?;
        self.sites.insert(name.to_owned(), url.trim().to_owned());
        Ok(())
    }

    /// Remove a site alias, returning its URL.
    pub fn remove_site(&mut self, name: &str) -> Result<String, ConfigError> {
        self.sites
            .remove(name)
            .ok_or_else(|| ConfigError::UnknownSite { name: name.into() })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "siteview", "siteview").map_or_else(
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
    p.push("siteview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults apply. Environment variables
/// use a double underscore between levels: `SITEVIEW_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SITEVIEW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load only what is written in `path`, without environment overrides.
///
/// Use this before editing and saving the file, so that `SITEVIEW_*`
/// variables are never persisted.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build an `AnalyzerConfig` from the file defaults, without CLI overrides.
pub fn to_analyzer_config(defaults: &Defaults) -> Result<AnalyzerConfig, ConfigError> {
    if defaults.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let tls = if defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = defaults.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = AnalyzerConfig {
        tls,
        timeout: Duration::from_secs(defaults.timeout),
        ..AnalyzerConfig::default()
    };
    if let Some(ref agent) = defaults.user_agent {
        config.user_agent.clone_from(agent);
    }
    Ok(config)
}
