// ── Core error types ──
//
// Domain-level errors from nifictl-core. The `From<nifictl_api::Error>`
// impl folds transport failures into the categories a caller acts on:
// resubmit, give up, fix the request, or fix the server. Retries have
// already been exhausted by the time any of these is returned.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    /// Credentials rejected or token acquisition exhausted its retries.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A 401 triggered a token refresh; the operation was not re-sent.
    #[error("Access token was refreshed -- resubmit the operation")]
    TokenRefreshed,

    // ── Remote failures ──────────────────────────────────────────────
    /// Timeout, connection failure or rate limit that outlived the retry budget.
    #[error("Transient failure talking to NiFi: {message}")]
    Transient { message: String },

    /// Non-retryable 4xx with the upstream status and body.
    #[error("NiFi rejected the request (HTTP {status}): {body}")]
    RemoteClient { status: u16, body: String },

    /// 5xx after retries.
    #[error("NiFi server error (HTTP {status}): {body}")]
    RemoteServer { status: u16, body: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    /// Malformed response shape. Never retried.
    #[error("Malformed response: {message}")]
    Parse { message: String },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Shorthand for a process-group lookup miss.
    pub fn process_group_not_found(id: &str) -> Self {
        Self::NotFound {
            entity_type: "Process group".into(),
            identifier: id.into(),
        }
    }

    /// Shorthand for a processor lookup miss.
    pub fn processor_not_found(id: &str) -> Self {
        Self::NotFound {
            entity_type: "Processor".into(),
            identifier: id.into(),
        }
    }

    /// Suggested transport-level status for a boundary layer that re-exposes
    /// these operations. The core never formats a response itself.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::AuthenticationFailed { .. } | Self::TokenRefreshed => 401,
            Self::NotFound { .. } => 404,
            Self::RemoteClient { status, .. } => *status,
            Self::InvalidArgument { .. } => 400,
            Self::Transient { .. } => 503,
            Self::RemoteServer { .. } | Self::Parse { .. } => 502,
            Self::Config { .. } => 500,
        }
    }

    /// Whether resubmitting the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TokenRefreshed | Self::Transient { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nifictl_api::Error> for CoreError {
    fn from(err: nifictl_api::Error) -> Self {
        use nifictl_api::Error as Api;

        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::TokenRefreshed => CoreError::TokenRefreshed,
            Api::Timeout { timeout_secs } => CoreError::Transient {
                message: format!("request timed out after {timeout_secs}s"),
            },
            Api::RateLimited { retry_after_secs } => CoreError::Transient {
                message: format!("rate limited (retry after {retry_after_secs}s)"),
            },
            Api::Transport(ref e) if e.is_timeout() || e.is_connect() => CoreError::Transient {
                message: e.to_string(),
            },
            Api::Transport(e) => match e.status() {
                Some(status) if status.is_server_error() => CoreError::RemoteServer {
                    status: status.as_u16(),
                    body: e.to_string(),
                },
                Some(status) => CoreError::RemoteClient {
                    status: status.as_u16(),
                    body: e.to_string(),
                },
                None => CoreError::Transient {
                    message: e.to_string(),
                },
            },
            Api::Client { status, body } => CoreError::RemoteClient { status, body },
            Api::Server { status, body } => CoreError::RemoteServer { status, body },
            Api::Deserialization { message, body: _ } => CoreError::Parse { message },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_domain_categories() {
        let err: CoreError = nifictl_api::Error::TokenRefreshed.into();
        assert!(matches!(err, CoreError::TokenRefreshed));
        assert!(err.is_retryable());

        let err: CoreError = nifictl_api::Error::Client {
            status: 409,
            body: "conflict".into(),
        }
        .into();
        assert!(matches!(err, CoreError::RemoteClient { status: 409, .. }));
        assert_eq!(err.status_hint(), 409);

        let err: CoreError = nifictl_api::Error::Deserialization {
            message: "missing field".into(),
            body: "{}".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Parse { .. }));
        assert!(!err.is_retryable());

        let err: CoreError = nifictl_api::Error::Timeout { timeout_secs: 30 }.into();
        assert!(matches!(err, CoreError::Transient { .. }));
    }

    #[test]
    fn not_found_hint() {
        assert_eq!(CoreError::process_group_not_found("x").status_hint(), 404);
        assert_eq!(
            CoreError::process_group_not_found("abc").to_string(),
            "Process group not found: abc"
        );
    }
}
