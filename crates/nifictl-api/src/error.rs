use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for the `nifictl-api` crate.
///
/// Covers every failure mode of the NiFi REST surface: token
/// acquisition, transport, HTTP status classes, and response parsing.
/// `nifictl-core` maps these into domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token acquisition failed (rejected credentials, refresh failure).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A 401 was answered by refreshing the access token. The request was
    /// not re-sent; the caller decides whether to resubmit it.
    #[error("Access token expired and was refreshed -- resubmit the request")]
    TokenRefreshed,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP status classes ─────────────────────────────────────────
    /// 429 from the server. Includes retry-after in seconds when advertised.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Non-retryable 4xx (other than 401), carrying the upstream body verbatim.
    #[error("NiFi rejected the request (HTTP {status}): {body}")]
    Client { status: u16, body: String },

    /// 5xx from the server.
    #[error("NiFi server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the access token was rejected
    /// and a resubmission might succeed.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::TokenRefreshed)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Timeouts, connection failures, 429 and 5xx qualify. Everything
    /// else (auth, 4xx, parse) is permanent for the current request.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::RateLimited { .. } | Self::Server { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(StatusCode::NOT_FOUND),
            Self::Client { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The upstream HTTP status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Truncate a response body for inclusion in error messages.
pub(crate) fn body_preview(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.chars().count() <= LIMIT {
        body.to_owned()
    } else {
        let mut preview: String = body.chars().take(LIMIT).collect();
        preview.push('…');
        preview
    }
}
