//! Periodic removal of idle server-hosted drafts.
//!
//! A draft whose owner stopped touching it is treated as abandoned; the
//! sweeper discards it without any further cleanup.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::drafts::DraftRegistry;

/// Upper bound on how often the sweep runs.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the draft expiry loop until `cancel` is triggered.
///
/// Sessions untouched for longer than `idle_timeout` are removed, including
/// ones stuck waiting on a submission.
pub async fn run(registry: Arc<DraftRegistry>, idle_timeout: Duration, cancel: CancellationToken) {
    let sweep_every = sweep_interval(idle_timeout);
    tracing::info!(
        idle_timeout_secs = idle_timeout.as_secs(),
        interval_secs = sweep_every.as_secs(),
        "Draft expiry job started"
    );

    let idle = match chrono::Duration::from_std(idle_timeout) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Draft expiry: idle timeout out of range, job disabled");
            return;
        }
    };

    let mut interval = tokio::time::interval(sweep_every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Draft expiry job stopping");
                break;
            }
            _ = interval.tick() => {
                let removed = registry.expire_idle(Utc::now() - idle).await;
                if removed > 0 {
                    tracing::info!(removed, "Draft expiry: discarded idle drafts");
                } else {
                    tracing::debug!("Draft expiry: nothing to discard");
                }
            }
        }
    }
}

/// Sweep at a tenth of the idle timeout, between one second and a minute.
fn sweep_interval(idle_timeout: Duration) -> Duration {
    (idle_timeout / 10).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
}
