// NiFi REST client
//
// Wraps `reqwest::Client` with bearer injection from the shared
// `AuthSession`, the uniform retry policy, status-class mapping, and the
// parsing layer. Endpoint methods live in sibling modules as inherent
// impls so this file stays focused on transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::AuthSession;
use crate::error::{Error, body_preview};
use crate::parse::{FieldPolicy, decode};
use crate::transport::{RetryPolicy, TransportConfig};

/// Append path segments to an API base URL, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Raw HTTP client for the NiFi REST API.
///
/// Every call carries the session's current bearer token and runs under
/// the configured retry policy. A 401 never re-sends the request: the
/// session is refreshed and the call fails with `Error::TokenRefreshed`.
pub struct NifiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<AuthSession>,
    retry: RetryPolicy,
    timeout: Duration,
    field_policy: FieldPolicy,
}

impl NifiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root including its prefix, e.g.
    /// `https://nifi:8443/nifi-api`. The session shares the same HTTP stack.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, transport.retry.clone(), transport.timeout)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let session = AuthSession::new(http.clone(), &base_url, retry.clone(), timeout)?;
        Ok(Self {
            http,
            base_url,
            session: Arc::new(session),
            retry,
            timeout,
            field_policy: FieldPolicy::default(),
        })
    }

    /// Switch the unknown-field policy used for every response.
    pub fn with_field_policy(mut self, policy: FieldPolicy) -> Self {
        self.field_policy = policy;
        self
    }

    /// The token session shared by every request of this client.
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn field_policy(&self) -> FieldPolicy {
        self.field_policy
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        endpoint(&self.base_url, segments)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the response body.
    pub(crate) async fn get<T>(&self, url: Url) -> Result<T, Error>
    where
        T: DeserializeOwned + Serialize,
    {
        let body = self.execute(Method::GET, &url, None).await?;
        decode(&body, self.field_policy)
    }

    /// Send a PUT request with a JSON body and decode the response body.
    pub(crate) async fn put<B, T>(&self, url: Url, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Serialize,
    {
        let payload = serde_json::to_value(body).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request body: {e}"),
            body: String::new(),
        })?;
        let text = self.execute(Method::PUT, &url, Some(&payload)).await?;
        decode(&text, self.field_policy)
    }

    /// Run one logical request under the retry policy.
    async fn execute(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<String, Error> {
        let operation = format!("{method} {}", url.path());
        self.retry
            .run(&operation, || self.send_once(method.clone(), url, body))
            .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<String, Error> {
        let token = self
            .session
            .current_token()
            .ok_or_else(|| Error::Authentication {
                message: "no access token -- the session was never initialized".into(),
            })?;

        debug!("{method} {url}");

        let mut request = self
            .http
            .request(method, url.clone())
            .timeout(self.timeout)
            .bearer_auth(token.expose_secret());
        if let Some(json) = body {
            request = request.json(json);
        }

        let resp = request.send().await.map_err(|e| self.map_send_error(e))?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            // The body is never read; dropping the response releases the connection.
            drop(resp);
            warn!(%url, "access token rejected, refreshing");
            self.session
                .refresh()
                .await
                .map_err(|e| Error::Authentication {
                    message: format!("token refresh after 401 failed: {e}"),
                })?;
            return Err(Error::TokenRefreshed);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            return Err(Error::RateLimited { retry_after_secs });
        }

        let text = resp.text().await.map_err(|e| self.map_send_error(e))?;

        if status.is_server_error() {
            return Err(Error::Server {
                status: status.as_u16(),
                body: text,
            });
        }
        if status.is_client_error() {
            debug!(status = status.as_u16(), body = %body_preview(&text), "request rejected");
            return Err(Error::Client {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

impl std::fmt::Debug for NifiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NifiClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .field("field_policy", &self.field_policy)
            .finish_non_exhaustive()
    }
}
