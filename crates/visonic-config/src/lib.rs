//! Shared configuration for Visonic tools.
//!
//! TOML profiles, user-code resolution (env + keyring + plaintext),
//! validation, and translation to `visonic_core::HubConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::{BTreeMap, HashMap};
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

use visonic_core::config::root_url_for_host;
use visonic_core::{AlarmState, HubConfig, PollOptions, TlsMode};

/// Keyring service name for stored user codes.
pub const KEYRING_SERVICE: &str = "visonic";

/// Environment variable consulted for the user code when the profile
/// names none.
pub const USER_CODE_ENV: &str = "VISONIC_USER_CODE";

/// Server used by the Visonic GO app.
pub const DEFAULT_HOST: &str = "visonic.tycomonitor.com";

const MAX_HOUR_OFFSET: i32 = 24;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no user code configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    ProfileNotFound { profile: String },

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named panel profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Minimum seconds between two unforced refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Milliseconds to wait after a command before refreshing.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval_secs: default_refresh_interval(),
            settle_delay_ms: default_settle_delay(),
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
fn default_refresh_interval() -> u64 {
    10
}
fn default_settle_delay() -> u64 {
    1000
}

/// A named panel profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Server hostname or URL.
    #[serde(default = "default_host")]
    pub host: String,

    /// Panel user code (plaintext -- prefer keyring or env var).
    pub user_code: Option<String>,

    /// Environment variable name containing the user code.
    pub user_code_env: Option<String>,

    /// Installation UUID sent at login.
    pub user_id: String,

    /// Panel id (web name).
    pub panel_id: String,

    /// Partition selector for commands.
    #[serde(default = "default_partition")]
    pub partition: String,

    /// Skip the local PIN check on commands.
    #[serde(default)]
    pub no_pin_required: bool,

    /// Use the instant variants for arm home/away.
    #[serde(default)]
    pub arm_instant: bool,

    /// Hours added to event timestamps.
    #[serde(default)]
    pub event_hour_offset: i32,

    /// Override the refresh interval.
    pub refresh_interval_secs: Option<u64>,

    /// Override the post-command settle delay.
    pub settle_delay_ms: Option<u64>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid certificates.
    pub insecure: Option<bool>,

    /// Extra raw-state spellings, e.g. `Night = "armed_home"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub state_aliases: BTreeMap<String, AlarmState>,
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}
fn default_partition() -> String {
    "ALL".into()
}

impl Profile {
    /// A profile with defaults for everything but the identity fields.
    pub fn new(user_id: impl Into<String>, panel_id: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            user_code: None,
            user_code_env: None,
            user_id: user_id.into(),
            panel_id: panel_id.into(),
            partition: default_partition(),
            no_pin_required: false,
            arm_instant: false,
            event_hour_offset: 0,
            refresh_interval_secs: None,
            settle_delay_ms: None,
            timeout: None,
            ca_cert: None,
            insecure: None,
            state_aliases: BTreeMap::new(),
        }
    }

    /// Check every field that can be checked without the network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        root_url_for_host(&self.host).map_err(|e| invalid("host", e.to_string()))?;

        uuid::Uuid::parse_str(self.user_id.trim())
            .map_err(|e| invalid("user_id", format!("expected a UUID: {e}")))?;

        if self.panel_id.trim().is_empty() {
            return Err(invalid("panel_id", "must not be empty"));
        }
        if self.partition.trim().is_empty() {
            return Err(invalid("partition", "must not be empty"));
        }
        if !(-MAX_HOUR_OFFSET..=MAX_HOUR_OFFSET).contains(&self.event_hour_offset) {
            return Err(invalid(
                "event_hour_offset",
                format!("must be between -{MAX_HOUR_OFFSET} and {MAX_HOUR_OFFSET}"),
            ));
        }
        if self.user_code.as_deref().is_some_and(|c| !is_valid_user_code(c)) {
            return Err(invalid("user_code", "must be digits only"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Panel user codes are numeric PINs.
pub fn is_valid_user_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_digit())
}

/// A fresh installation id for `user_id`. The server ties sessions to it,
/// so it should be generated once per installation and kept.
pub fn new_user_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "visonic", "visonic").map_or_else(
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
    p.push("visonic");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, then `VISONIC_`-prefixed environment
/// variables (nested keys separated by `__`, e.g.
/// `VISONIC_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VISONIC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── User code resolution ────────────────────────────────────────────

/// Keyring entry name for a profile's user code.
pub fn keyring_key(profile_name: &str) -> String {
    format!("{profile_name}/user-code")
}

/// Resolve the user code: the profile's `user_code_env`, then
/// `VISONIC_USER_CODE`, then the system keyring, then plaintext.
pub fn resolve_user_code(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_user_code_with(profile, profile_name, |key| {
        keyring::Entry::new(KEYRING_SERVICE, key)
            .ok()
            .and_then(|entry| entry.get_password().ok())
    })
}

/// [`resolve_user_code`] with a caller-supplied keyring lookup.
pub fn resolve_user_code_with(
    profile: &Profile,
    profile_name: &str,
    keyring_lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's user_code_env → env var lookup
    if let Some(val) = profile
        .user_code_env
        .as_ref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(USER_CODE_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Some(code) = keyring_lookup(&keyring_key(profile_name)) {
        return Ok(SecretString::from(code));
    }

    // 4. Plaintext in config
    if let Some(ref code) = profile.user_code {
        return Ok(SecretString::from(code.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a user code in the system keyring.
pub fn store_user_code(profile_name: &str, code: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name))
        .map_err(|e| invalid("keyring", format!("failed to access keyring: {e}")))?;
    entry
        .set_password(code)
        .map_err(|e| invalid("keyring", format!("failed to store user code: {e}")))
}

// ── Translation to HubConfig ────────────────────────────────────────

/// Build a `HubConfig` from a validated profile and an already resolved
/// user code.
pub fn build_hub_config(
    profile: &Profile,
    defaults: &Defaults,
    user_code: SecretString,
) -> Result<HubConfig, ConfigError> {
    profile.validate()?;

    let mut config = HubConfig::new(
        &profile.host,
        user_code,
        profile.user_id.trim(),
        profile.panel_id.trim(),
    )
    .map_err(|e| invalid("host", e.to_string()))?;

    config.partition.clone_from(&profile.partition);
    config.poll = PollOptions {
        no_pin_required: profile.no_pin_required,
        arm_instant: profile.arm_instant,
        event_hour_offset: profile.event_hour_offset,
    };
    config.refresh_interval = Duration::from_secs(
        profile
            .refresh_interval_secs
            .unwrap_or(defaults.refresh_interval_secs),
    );
    config.settle_delay =
        Duration::from_millis(profile.settle_delay_ms.unwrap_or(defaults.settle_delay_ms));
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    config.state_aliases = profile
        .state_aliases
        .iter()
        .map(|(raw, state)| (raw.clone(), *state))
        .collect();

    Ok(config)
}

/// Resolve the user code and build a `HubConfig` -- no CLI overrides.
pub fn profile_to_hub_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<HubConfig, ConfigError> {
    let user_code = resolve_user_code(profile, profile_name)?;
    build_hub_config(profile, defaults, user_code)
}
