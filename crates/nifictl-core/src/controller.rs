// ── Controller abstraction ──
//
// Single entry point for consumers. Owns the authenticated client and
// hands out the catalog, control and status services that share it.
// Every status stream opened here is tied to the controller's
// cancellation token, so `shutdown()` ends all of them at once.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use nifictl_api::NifiClient;

use crate::analysis;
use crate::catalog::ResourceCatalog;
use crate::config::{ConnectionConfig, Credentials};
use crate::control::ControlService;
use crate::error::CoreError;
use crate::model::ProcessGroupAnalysis;
use crate::status::{PollInterval, StatusService, StatusStream, TickFailurePolicy};

// ── ConnectionState ──────────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────────

/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    credentials: Credentials,
    client: Arc<NifiClient>,
    catalog: ResourceCatalog,
    control: ControlService,
    status: StatusService,
    connection_state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
}

impl Controller {
    /// Build a controller from configuration. Does NOT authenticate --
    /// call [`connect()`](Self::connect) first.
    pub fn new(config: ConnectionConfig) -> Result<Self, CoreError> {
        let transport = config.transport();
        let client =
            NifiClient::new(config.url.clone(), &transport)?.with_field_policy(config.field_policy);
        Ok(Self::with_client(client, config.credentials))
    }

    /// Wrap an already-built client (custom `reqwest::Client`, tests).
    pub fn with_client(client: NifiClient, credentials: Credentials) -> Self {
        let client = Arc::new(client);
        let catalog = ResourceCatalog::new(Arc::clone(&client));
        let control = ControlService::new(Arc::clone(&client), catalog.clone());
        let status = StatusService::new(Arc::clone(&client));
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            inner: Arc::new(ControllerInner {
                credentials,
                client,
                catalog,
                control,
                status,
                connection_state,
                cancel: CancellationToken::new(),
            }),
        }
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Acquire the first access token.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        let Credentials { username, password } = &self.inner.credentials;
        match self
            .inner
            .client
            .session()
            .initialize(username, password.clone())
            .await
        {
            Ok(_) => {
                let _ = self.inner.connection_state.send(ConnectionState::Connected);
                info!(url = %self.inner.client.base_url(), "connected to NiFi");
                Ok(())
            }
            Err(e) => {
                let _ = self.inner.connection_state.send(ConnectionState::Failed);
                warn!(error = %e, "connection failed");
                Err(e.into())
            }
        }
    }

    /// Cancel every stream opened through this controller and drop the token.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.client.session().invalidate();
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("controller shut down");
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn client(&self) -> &Arc<NifiClient> {
        &self.inner.client
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.inner.catalog
    }

    pub fn control(&self) -> &ControlService {
        &self.inner.control
    }

    pub fn status(&self) -> &StatusService {
        &self.inner.status
    }

    // ── Composite operations ─────────────────────────────────────────

    /// Fetch a snapshot and analyze it.
    pub async fn analyze_process_group(
        &self,
        process_group_id: &str,
    ) -> Result<ProcessGroupAnalysis, CoreError> {
        let snapshot = self.inner.status.get_snapshot(process_group_id).await?;
        let result = analysis::analyze(&snapshot);
        analysis::log_summary(&result);
        Ok(result)
    }

    /// Open a status stream that also ends on `shutdown()`.
    pub fn watch(
        &self,
        process_group_id: &str,
        interval: PollInterval,
        on_failure: TickFailurePolicy,
    ) -> StatusStream {
        self.inner.status.stream_snapshots_with_cancel(
            process_group_id,
            interval,
            on_failure,
            self.inner.cancel.child_token(),
        )
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("url", &self.inner.client.base_url().as_str())
            .field("username", &self.inner.credentials.username)
            .field("state", &*self.inner.connection_state.borrow())
            .finish_non_exhaustive()
    }
}
