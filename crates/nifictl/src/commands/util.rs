//! Shared helpers for command handlers.

use std::future::Future;

use tracing::debug;

use nifictl_core::CoreError;

use crate::error::CliError;

/// Run `op`, and run it once more if the first attempt reports that the
/// access token was refreshed underneath it.
///
/// The core never re-sends a request after a 401; the caller decides.
/// For read operations and idempotent run-state changes a single resubmit
/// is always safe.
pub async fn resubmit_once<T, F, Fut>(mut op: F) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    match op().await {
        Err(CoreError::TokenRefreshed) => {
            debug!("access token refreshed, resubmitting once");
            op().await
        }
        other => other,
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Validation {
            field: "interactive".into(),
            reason: format!("prompt failed: {e} (use --yes in non-interactive contexts)"),
        })?;
    Ok(confirmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn resubmits_exactly_once_after_refresh() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = resubmit_once(move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(CoreError::TokenRefreshed)
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_refresh_is_surfaced() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = resubmit_once(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::TokenRefreshed)
        })
        .await;
        assert!(matches!(result, Err(CoreError::TokenRefreshed)));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_errors_are_not_resubmitted() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = resubmit_once(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::process_group_not_found("pg-1"))
        })
        .await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
