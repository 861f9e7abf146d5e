// ── Runtime connection configuration ──
//
// These types describe *how* to reach a NiFi instance. They carry the
// credentials and connection tuning but never touch disk. The CLI builds a
// `ConnectionConfig` from its profile and hands it to `Controller`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use tracing::warn;
use url::Url;

use nifictl_api::{FieldPolicy, RetryPolicy, TlsMode, TransportConfig};

/// Username and password for `POST /access/token`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Only ever selected explicitly.
    DangerAcceptInvalid,
}

impl TlsVerification {
    /// Pick the verification mode for `url`.
    ///
    /// Plain `http` never involves TLS, so the insecure flag is ignored
    /// there. For `https` the insecure flag wins over a custom CA, and with
    /// neither set the system store verifies the certificate.
    pub fn derive(url: &Url, insecure: bool, ca_cert: Option<PathBuf>) -> Self {
        if url.scheme() != "https" {
            return Self::SystemDefaults;
        }
        if insecure {
            warn!(%url, "insecure mode requested: TLS certificates will not be verified");
            return Self::DangerAcceptInvalid;
        }
        ca_cert.map_or(Self::SystemDefaults, Self::CustomCa)
    }
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to a single NiFi instance.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// API root including its prefix (e.g. `https://nifi:8443/nifi-api`).
    pub url: Url,
    pub credentials: Credentials,
    pub tls: TlsVerification,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures.
    pub retry_attempts: u32,
    /// Base delay of the exponential backoff.
    pub retry_delay: Duration,
    /// Unknown-field handling for every response.
    pub field_policy: FieldPolicy,
}

impl ConnectionConfig {
    /// A config with the service defaults: 30s timeout, 3 retries, 1s base delay.
    pub fn new(url: Url, credentials: Credentials) -> Self {
        Self {
            url,
            credentials,
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(30),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(1000),
            field_policy: FieldPolicy::IgnoreUnknown,
        }
    }

    /// The api-level transport settings for this connection.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            retry: RetryPolicy {
                max_retries: self.retry_attempts,
                base_delay: self.retry_delay,
                ..RetryPolicy::default()
            },
        }
    }
}
