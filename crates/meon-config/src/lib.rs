//! Shared configuration for the meon panel.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation into the inputs `meon_core` needs: an `OrchestratorConfig`,
//! the starting `SessionState`, and `Credentials`.
//!
//! Missing API URL, instance or credentials are not errors here. They are
//! passed through empty so the orchestrator can report them the same way
//! the panel does.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use meon_core::{Credentials, OrchestratorConfig, ReentryPolicy, SessionState, TlsVerification};

/// Gateway address used when neither a flag nor the profile sets one.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Service name for passwords stored in the system keyring.
pub const KEYRING_SERVICE: &str = "meon-panel";

const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile '{name}' not found in configuration")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// `allow` runs overlapping calls of one action; `reject` records
    /// "Ação já está em andamento." for the second one.
    #[serde(default)]
    pub reentry: ReentryPolicy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            reentry: ReentryPolicy::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named gateway profile. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Gateway base URL (e.g., "http://localhost:8080").
    pub api_url: Option<String>,

    /// Instance identifier sent as `id`.
    pub instance: Option<String>,

    /// Basic-auth username.
    pub username: Option<String>,

    /// Basic-auth password (plaintext; prefer keyring or `password_env`).
    pub password: Option<String>,

    /// Environment variable name holding the password.
    pub password_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the re-entry policy.
    pub reentry: Option<ReentryPolicy>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "meon", "meon-panel").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("meon-panel");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file, then `MEON_`-prefixed env vars
/// (`__` separates nested keys, e.g. `MEON_DEFAULTS__TIMEOUT`).
fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MEON_").split("__"))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
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

// ── Profile selection ───────────────────────────────────────────────

/// Active profile name: explicit request, then `default_profile`, then "default".
pub fn active_profile_name(requested: Option<&str>, config: &Config) -> String {
    requested
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Pick the active profile. An explicitly requested profile must exist;
/// a missing default profile just means "no stored settings".
pub fn select_profile(
    requested: Option<&str>,
    config: &Config,
) -> Result<(String, Profile), ConfigError> {
    let name = active_profile_name(requested, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if requested.is_some() => Err(ConfigError::ProfileNotFound {
            name,
            available: config.profile_names(),
        }),
        None => Ok((name, Profile::default())),
    }
}

// ── Passwords ───────────────────────────────────────────────────────

fn keyring_key(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

fn keyring_lookup(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name))
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

/// Resolve the password: flag/env override, `password_env`, keyring,
/// plaintext. `None` when nothing is configured.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    flag: Option<&SecretString>,
) -> Option<SecretString> {
    resolve_password_with(
        profile,
        profile_name,
        flag,
        |name| std::env::var(name).ok(),
        keyring_lookup,
    )
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    flag: Option<&SecretString>,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    if let Some(secret) = flag {
        return Some(secret.clone());
    }

    if let Some(value) = profile.password_env.as_deref().and_then(&env) {
        return Some(SecretString::from(value));
    }

    if let Some(value) = keyring(profile_name) {
        debug!(profile = profile_name, "password read from keyring");
        return Some(SecretString::from(value));
    }

    profile.password.clone().map(SecretString::from)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Command-line overrides, already merged with their `MEON_*` env vars.
#[derive(Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub api_url: Option<String>,
    pub instance: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub insecure: bool,
    pub timeout: Option<u64>,
}

/// Everything a one-shot command or the panel needs to start.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub session: SessionState,
    pub credentials: Credentials,
    pub orchestrator: OrchestratorConfig,
}

/// Merge flags, the active profile and `[defaults]`.
pub fn resolve(config: &Config, overrides: &Overrides) -> Result<Resolved, ConfigError> {
    let (profile_name, profile) = select_profile(overrides.profile.as_deref(), config)?;
    let password = resolve_password(&profile, &profile_name, overrides.password.as_ref());
    Ok(assemble(config, &profile, profile_name, overrides, password))
}

fn assemble(
    config: &Config,
    profile: &Profile,
    profile_name: String,
    overrides: &Overrides,
    password: Option<SecretString>,
) -> Resolved {
    let api_url = overrides
        .api_url
        .clone()
        .or_else(|| profile.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.into());
    let instance = overrides
        .instance
        .clone()
        .or_else(|| profile.instance.clone())
        .unwrap_or_default();
    let username = overrides
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .unwrap_or_default();
    let password = password.unwrap_or_else(|| SecretString::from(String::new()));

    let insecure = overrides.insecure || profile.insecure.unwrap_or(config.defaults.insecure);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = overrides
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Resolved {
        profile_name,
        session: SessionState::new(api_url, instance),
        credentials: Credentials::new(username, password),
        orchestrator: OrchestratorConfig {
            tls,
            timeout: Duration::from_secs(timeout),
            reentry: profile.reentry.unwrap_or(config.defaults.reentry),
        },
    }
}
