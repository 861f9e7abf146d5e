//! Shared configuration for the nifictl CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `nifictl_core::ConnectionConfig`. The CLI layers
//! its `GlobalOpts` overrides on top of what this crate returns.

use std::collections::HashMap;
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
use url::Url;

use nifictl_api::FieldPolicy;
use nifictl_core::{ConnectionConfig, Credentials, TlsVerification};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "nifictl";

/// Prefix for environment overrides (`NIFICTL_DEFAULTS__TIMEOUT=10`).
pub const ENV_PREFIX: &str = "NIFICTL_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

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
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named NiFi instances.
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
    /// Name of the active profile: explicit choice, then `default_profile`,
    /// then `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retries after the first attempt.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Base backoff delay in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1000
}
fn default_api_prefix() -> String {
    "/nifi-api".into()
}

/// A named NiFi instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Server root, e.g. "https://nifi.internal:8443".
    pub url: String,

    /// Path of the REST API under `url`.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    pub username: Option<String>,

    /// Plaintext password (prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,
    pub timeout: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,

    /// Fail on response fields the client does not model.
    #[serde(default)]
    pub strict_parsing: bool,
}

impl Profile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_prefix: default_api_prefix(),
            username: None,
            password: None,
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            retry_attempts: None,
            retry_delay_ms: None,
            strict_parsing: false,
        }
    }

    /// Server URL with the API prefix appended.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.url).map_err(|e| ConfigError::Validation {
            field: "url".into(),
            reason: format!("{}: {e}", self.url),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::Validation {
                field: "url".into(),
                reason: format!("{} cannot carry a path", self.url),
            });
        }

        let prefix = self.api_prefix.trim_matches('/');
        let path = format!("{}/{prefix}", url.path().trim_end_matches('/'));
        url.set_path(&path);
        Ok(url)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "nifictl", "nifictl").map_or_else(
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
    p.push("nifictl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Store a password in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Resolve username and password for a profile.
///
/// Username: profile, then `NIFICTL_USERNAME`. Password: the profile's
/// `password_env` (or `NIFICTL_PASSWORD`), then the system keyring, then
/// the plaintext `password` field.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    resolve_credentials_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        |user| {
            keyring::Entry::new(KEYRING_SERVICE, user)
                .and_then(|entry| entry.get_password())
                .ok()
        },
    )
}

/// Credential chain with injectable env and keyring lookups.
pub fn resolve_credentials_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, ConfigError> {
    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let username = profile
        .username
        .clone()
        .or_else(|| env("NIFICTL_USERNAME"))
        .ok_or_else(no_credentials)?;

    let env_name = profile.password_env.as_deref().unwrap_or("NIFICTL_PASSWORD");
    let password = env(env_name)
        .or_else(|| keyring(&keyring_user(profile_name)))
        .or_else(|| profile.password.clone())
        .ok_or_else(no_credentials)?;

    Ok(Credentials {
        username,
        password: SecretString::from(password),
    })
}

/// Build a `ConnectionConfig` from a profile and the global defaults.
pub fn profile_to_connection_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionConfig, ConfigError> {
    let credentials = resolve_credentials(profile, profile_name)?;
    build_connection_config(profile, defaults, credentials)
}

/// Same as `profile_to_connection_config` with credentials already resolved.
pub fn build_connection_config(
    profile: &Profile,
    defaults: &Defaults,
    credentials: Credentials,
) -> Result<ConnectionConfig, ConfigError> {
    let url = profile.api_url()?;

    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let insecure = profile.insecure.unwrap_or(defaults.insecure);
    let tls = TlsVerification::derive(&url, insecure, profile.ca_cert.clone());

    let mut config = ConnectionConfig::new(url, credentials);
    config.tls = tls;
    config.timeout = Duration::from_secs(timeout);
    config.retry_attempts = profile.retry_attempts.unwrap_or(defaults.retry_attempts);
    config.retry_delay =
        Duration::from_millis(profile.retry_delay_ms.unwrap_or(defaults.retry_delay_ms));
    config.field_policy = if profile.strict_parsing {
        FieldPolicy::RejectUnknown
    } else {
        FieldPolicy::IgnoreUnknown
    };
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn api_url_joins_prefix() {
        let profile = Profile::new("https://nifi.local:8443/");
        assert_eq!(
            profile.api_url().unwrap().as_str(),
            "https://nifi.local:8443/nifi-api"
        );

        let mut nested = Profile::new("https://gw.local/proxy");
        nested.api_prefix = "nifi-api/".into();
        assert_eq!(
            nested.api_url().unwrap().as_str(),
            "https://gw.local/proxy/nifi-api"
        );
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let err = Profile::new("not a url").api_url().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "url"));
    }

    #[test]
    fn password_chain_prefers_env_then_keyring_then_plaintext() {
        let mut profile = Profile::new("https://nifi.local");
        profile.username = Some("admin".into());
        profile.password = Some("plain".into());
        profile.password_env = Some("PROD_NIFI_PW".into());

        let creds = resolve_credentials_with(
            &profile,
            "prod",
            |name| (name == "PROD_NIFI_PW").then(|| "from-env".to_owned()),
            |_| Some("from-keyring".into()),
        )
        .unwrap();
        assert_eq!(creds.password.expose_secret(), "from-env");

        let creds = resolve_credentials_with(&profile, "prod", no_env, |user| {
            (user == "prod/password").then(|| "from-keyring".to_owned())
        })
        .unwrap();
        assert_eq!(creds.password.expose_secret(), "from-keyring");

        let creds = resolve_credentials_with(&profile, "prod", no_env, no_env).unwrap();
        assert_eq!(creds.password.expose_secret(), "plain");
        assert_eq!(creds.username, "admin");
    }

    #[test]
    fn username_falls_back_to_env() {
        let mut profile = Profile::new("https://nifi.local");
        profile.password = Some("pw".into());
        let creds = resolve_credentials_with(
            &profile,
            "default",
            |name| (name == "NIFICTL_USERNAME").then(|| "ops".to_owned()),
            no_env,
        )
        .unwrap();
        assert_eq!(creds.username, "ops");
    }

    #[test]
    fn missing_password_is_no_credentials() {
        let mut profile = Profile::new("https://nifi.local");
        profile.username = Some("admin".into());
        let err = resolve_credentials_with(&profile, "lab", no_env, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "lab"));
    }

    #[test]
    fn connection_config_applies_overrides() {
        let mut profile = Profile::new("https://nifi.local:8443");
        profile.timeout = Some(10);
        profile.retry_attempts = Some(5);
        profile.insecure = Some(true);
        profile.strict_parsing = true;

        let creds = Credentials {
            username: "admin".into(),
            password: SecretString::from("pw".to_string()),
        };
        let config = build_connection_config(&profile, &Defaults::default(), creds).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.field_policy, FieldPolicy::RejectUnknown);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut profile = Profile::new("http://nifi.local:8080");
        profile.timeout = Some(0);
        let creds = Credentials {
            username: "admin".into(),
            password: SecretString::from("pw".to_string()),
        };
        assert!(build_connection_config(&profile, &Defaults::default(), creds).is_err());
    }

    #[test]
    fn active_profile_name_order() {
        let mut config = Config::default();
        assert_eq!(config.active_profile_name(Some("lab")), "lab");
        assert_eq!(config.active_profile_name(None), "default");
        config.default_profile = None;
        assert_eq!(config.active_profile_name(None), "default");
        assert!(matches!(
            config.profile("nope"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }
}
