// Token session
//
// NiFi issues short-lived bearer tokens from `POST /access/token`. The
// session keeps the current token in a lock-free slot that every request
// reads; a 401 anywhere in the client swaps in a fresh token. Readers never
// wait on a refresh and always see the last committed value.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use url::Url;

use crate::client::endpoint;
use crate::error::{Error, body_preview};
use crate::transport::RetryPolicy;

/// A bearer token as held by the session. Replaced, never mutated.
pub type AccessToken = Arc<SecretString>;

#[derive(Debug)]
struct Credentials {
    username: String,
    password: SecretString,
}

/// Owns the access token for one NiFi endpoint.
///
/// Shared by reference between the client and anything else that needs to
/// observe or force a refresh. Concurrent refreshes are harmless: each one
/// commits a complete token and the last writer wins.
pub struct AuthSession {
    http: reqwest::Client,
    token_url: Url,
    retry: RetryPolicy,
    timeout: Duration,
    credentials: ArcSwapOption<Credentials>,
    token: ArcSwapOption<SecretString>,
}

impl AuthSession {
    /// Create an empty session for the API rooted at `api_base`
    /// (e.g. `https://nifi:8443/nifi-api`).
    pub fn new(
        http: reqwest::Client,
        api_base: &Url,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            token_url: endpoint(api_base, &["access", "token"])?,
            retry,
            timeout,
            credentials: ArcSwapOption::empty(),
            token: ArcSwapOption::empty(),
        })
    }

    /// The latest committed token, if one has been acquired.
    pub fn current_token(&self) -> Option<AccessToken> {
        self.token.load_full()
    }

    /// Whether `initialize` has stored credentials for refreshes.
    pub fn has_credentials(&self) -> bool {
        self.credentials.load().is_some()
    }

    /// Store the credentials and acquire the first token.
    ///
    /// The token call is retried with the session's backoff policy.
    /// Rejected credentials fail immediately with `Error::Authentication`;
    /// exhausted retries surface as `Error::Authentication` too.
    pub async fn initialize(
        &self,
        username: &str,
        password: SecretString,
    ) -> Result<AccessToken, Error> {
        self.credentials.store(Some(Arc::new(Credentials {
            username: username.to_owned(),
            password,
        })));
        let token = self.acquire().await?;
        info!(username, "access token acquired");
        Ok(token)
    }

    /// Re-acquire a token with the credentials given to `initialize`.
    pub async fn refresh(&self) -> Result<AccessToken, Error> {
        let token = self.acquire().await?;
        debug!("access token refreshed");
        Ok(token)
    }

    /// Forget the current token. Credentials are kept for the next refresh.
    pub fn invalidate(&self) {
        self.token.store(None);
    }

    async fn acquire(&self) -> Result<AccessToken, Error> {
        let Some(credentials) = self.credentials.load_full() else {
            return Err(Error::Authentication {
                message: "no credentials -- call initialize first".into(),
            });
        };

        let raw = self
            .retry
            .run("POST /access/token", || self.fetch_token(&credentials))
            .await
            .map_err(|err| match err {
                Error::Authentication { .. } => err,
                other => Error::Authentication {
                    message: format!("token request failed: {other}"),
                },
            })?;

        let token = Arc::new(SecretString::from(raw));
        self.token.store(Some(Arc::clone(&token)));
        Ok(token)
    }

    async fn fetch_token(&self, credentials: &Credentials) -> Result<String, Error> {
        debug!("POST {}", self.token_url);

        let resp = self
            .http
            .post(self.token_url.clone())
            .timeout(self.timeout)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    Error::Transport(e)
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                retry_after_secs: 0,
            });
        }
        if status.is_server_error() {
            return Err(Error::Server {
                status: status.as_u16(),
                body: body_preview(&body),
            });
        }
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!(
                    "token request rejected (HTTP {status}): {}",
                    body_preview(&body)
                ),
            });
        }

        let token = body.trim();
        if token.is_empty() {
            return Err(Error::Authentication {
                message: "token endpoint returned an empty body".into(),
            });
        }
        Ok(token.to_owned())
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token_url", &self.token_url.as_str())
            .field("has_token", &self.token.load().is_some())
            .finish_non_exhaustive()
    }
}
