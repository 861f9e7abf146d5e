// ── Status snapshots and polling streams ──
//
// `get_snapshot` is one authenticated fetch. `stream_snapshots` turns that
// fetch into a lazy, cancellable sequence driven by a fixed-interval timer:
// nothing runs until the stream is first polled, the first tick fires
// immediately, and at most one fetch is in flight at a time.
//
// Cancelling (via `StatusStream::cancel`, a cancelled parent token, or
// dropping the stream) drops the timer and any in-flight request. No
// background task exists, so nothing can keep fetching afterwards.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_core::Stream;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use nifictl_api::NifiClient;

use crate::convert::snapshot_from_entity;
use crate::error::CoreError;
use crate::model::{ProcessorStatus, StatusSnapshot};

// ── PollInterval ─────────────────────────────────────────────────────

/// Polling period for a status stream, 1 to 60 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    pub const MIN_SECS: u64 = 1;
    pub const MAX_SECS: u64 = 60;

    pub fn from_secs(secs: u64) -> Result<Self, CoreError> {
        if (Self::MIN_SECS..=Self::MAX_SECS).contains(&secs) {
            Ok(Self(Duration::from_secs(secs)))
        } else {
            Err(CoreError::InvalidArgument {
                field: "interval".into(),
                reason: format!(
                    "must be between {} and {} seconds, got {secs}",
                    Self::MIN_SECS,
                    Self::MAX_SECS
                ),
            })
        }
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(Duration::from_secs(5))
    }
}

/// What a stream does when one tick's fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickFailurePolicy {
    /// Yield the error, then end the stream.
    #[default]
    Terminate,
    /// Log the error and wait for the next tick. The consumer never sees it.
    Skip,
}

// ── StatusStream ─────────────────────────────────────────────────────

type SnapshotStream = Pin<Box<dyn Stream<Item = Result<StatusSnapshot, CoreError>> + Send>>;

/// Live sequence of snapshots for one process group.
pub struct StatusStream {
    inner: Option<SnapshotStream>,
    cancel: CancellationToken,
}

impl StatusStream {
    /// Stop polling. The timer and any in-flight request are dropped now.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.inner = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token observed by the stream; cancelling it ends the stream.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Stream for StatusStream {
    type Item = Result<StatusSnapshot, CoreError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.cancel.is_cancelled() {
            this.inner = None;
        }
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                this.inner = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Drop for StatusStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for StatusStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusStream")
            .field("active", &self.inner.is_some())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

// ── StatusService ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StatusService {
    client: Arc<NifiClient>,
}

impl StatusService {
    pub fn new(client: Arc<NifiClient>) -> Self {
        Self { client }
    }

    /// Fetch one snapshot. A 404 becomes `NotFound`.
    pub async fn get_snapshot(&self, process_group_id: &str) -> Result<StatusSnapshot, CoreError> {
        fetch_snapshot(&self.client, process_group_id).await
    }

    /// Status entry of one processor inside a group's snapshot.
    pub async fn processor_status(
        &self,
        process_group_id: &str,
        processor_id: &str,
    ) -> Result<ProcessorStatus, CoreError> {
        let snapshot = self.get_snapshot(process_group_id).await?;
        snapshot
            .processor(processor_id)
            .cloned()
            .ok_or_else(|| CoreError::processor_not_found(processor_id))
    }

    /// Poll a group's status every `interval` until cancelled.
    pub fn stream_snapshots(
        &self,
        process_group_id: &str,
        interval: PollInterval,
        on_failure: TickFailurePolicy,
    ) -> StatusStream {
        self.stream_snapshots_with_cancel(
            process_group_id,
            interval,
            on_failure,
            CancellationToken::new(),
        )
    }

    /// Like `stream_snapshots`, but ends when `cancel` (or any parent of
    /// it) is cancelled.
    pub fn stream_snapshots_with_cancel(
        &self,
        process_group_id: &str,
        interval: PollInterval,
        on_failure: TickFailurePolicy,
        cancel: CancellationToken,
    ) -> StatusStream {
        let client = Arc::clone(&self.client);
        let id = process_group_id.to_owned();
        let token = cancel.clone();

        let inner = async_stream::stream! {
            let mut ticker = tokio::time::interval(interval.as_duration());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tick += 1;

                let fetched = tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    result = fetch_snapshot(&client, &id) => result,
                };

                match fetched {
                    Ok(snapshot) => {
                        debug!(process_group = %id, tick, "status snapshot");
                        yield Ok(snapshot);
                    }
                    Err(err) if on_failure == TickFailurePolicy::Skip => {
                        warn!(process_group = %id, tick, error = %err, "status fetch failed, skipping tick");
                    }
                    Err(err) => {
                        warn!(process_group = %id, tick, error = %err, "status fetch failed, ending stream");
                        yield Err(err);
                        break;
                    }
                }
            }
            debug!(process_group = %id, ticks = tick, "status stream finished");
        };

        StatusStream {
            inner: Some(Box::pin(inner)),
            cancel,
        }
    }
}

async fn fetch_snapshot(client: &NifiClient, id: &str) -> Result<StatusSnapshot, CoreError> {
    match client.get_process_group_status(id).await {
        Ok(entity) => Ok(snapshot_from_entity(entity, id)),
        Err(e) if e.is_not_found() => Err(CoreError::process_group_not_found(id)),
        Err(e) => Err(e.into()),
    }
}
