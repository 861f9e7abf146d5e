//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use nifictl_config::ConfigError;
use nifictl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach NiFi: {reason}")]
    #[diagnostic(
        code(nifictl::connection_failed),
        help(
            "Check that NiFi is running and reachable, or raise --timeout.\n\
             Retries were already exhausted before giving up."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(nifictl::auth_failed),
        help(
            "Verify the username and password for this profile.\n\
             Run: nifictl config set-password --profile <name>"
        )
    )]
    AuthFailed { message: String },

    #[error("Access token was refreshed again while resubmitting")]
    #[diagnostic(
        code(nifictl::token_refreshed),
        help("The server keeps rejecting fresh tokens. Check its clock and identity provider.")
    )]
    TokenChurn,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(nifictl::no_credentials),
        help(
            "Set a password with: nifictl config set-password\n\
             Or export NIFICTL_USERNAME and NIFICTL_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(nifictl::not_found),
        help("Run: nifictl {list_command} to see what the server knows about")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("NiFi rejected the request (HTTP {status}): {body}")]
    #[diagnostic(code(nifictl::rejected))]
    Rejected { status: u16, body: String },

    #[error("NiFi server error (HTTP {status}): {body}")]
    #[diagnostic(code(nifictl::server_error))]
    ServerError { status: u16, body: String },

    #[error("Unexpected response shape: {message}")]
    #[diagnostic(
        code(nifictl::malformed_response),
        help("The server answered with a payload this client does not understand.")
    )]
    MalformedResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nifictl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(nifictl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: nifictl config set-profile <name> --url <url>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No NiFi server configured")]
    #[diagnostic(
        code(nifictl::no_config),
        help(
            "Pass --url, set NIFICTL_URL, or create a profile with:\n\
             nifictl config set-profile default --url https://nifi:8443\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(nifictl::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(nifictl::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(nifictl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::TokenChurn => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { status: 409, .. } => exit_code::CONFLICT,
            Self::Rejected { status: 403, .. } => exit_code::PERMISSION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::TokenRefreshed => CliError::TokenChurn,
            CoreError::Transient { message } => CliError::ConnectionFailed { reason: message },
            CoreError::RemoteClient { status, body } => CliError::Rejected { status, body },
            CoreError::RemoteServer { status, body } => CliError::ServerError { status, body },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => {
                let list_command = if entity_type.eq_ignore_ascii_case("processor") {
                    "resources list --kind processor"
                } else {
                    "resources list --kind process-group"
                };
                CliError::NotFound {
                    resource_type: entity_type,
                    identifier,
                    list_command: list_command.into(),
                }
            }
            CoreError::Parse { message } => CliError::MalformedResponse { message },
            CoreError::InvalidArgument { field, reason } => CliError::Validation { field, reason },
            CoreError::Config { message } => CliError::Validation {
                field: "connection".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
