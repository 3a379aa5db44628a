//! Health poller: wait until a target is healthy or a deadline passes.
//!
//! The probe loop runs in its own task and reports the first healthy
//! outcome over a one-shot channel. The caller races that channel against
//! the deadline; when the deadline wins the task is aborted, so a probe
//! still in flight is dropped rather than awaited.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{HealthError, HealthResult};
use crate::probe::{HttpProbe, Probe, ProbeOutcome, Target};

/// Fixed pause between a failed probe and the next attempt.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Polls a single target until it reports healthy.
#[derive(Debug)]
pub struct HealthPoller<P> {
    probe: Arc<P>,
}

impl HealthPoller<HttpProbe> {
    /// Poller that probes `target` over HTTP or HTTPS.
    pub fn http(target: Target) -> HealthResult<Self> {
        Ok(Self::new(HttpProbe::new(target)?))
    }
}

impl<P: Probe + 'static> HealthPoller<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe: Arc::new(probe),
        }
    }

    /// Returns `true` once the target answers `200 OK`, or `false` if
    /// `deadline` elapses first.
    ///
    /// `None` and `Some(Duration::ZERO)` both mean "no deadline".
    pub async fn poll(&self, deadline: Option<Duration>) -> bool {
        self.wait(deadline).await.is_ok()
    }

    /// Like [`poll`](Self::poll), but reports a timeout as
    /// [`HealthError::DeadlineExceeded`].
    pub async fn wait(&self, deadline: Option<Duration>) -> HealthResult<()> {
        let started = Instant::now();
        // A deadline too far out to represent as an instant never fires.
        let expires_at = deadline
            .filter(|limit| !limit.is_zero())
            .and_then(|limit| Some((limit, started.checked_add(limit)?)));
        let deadline = expires_at.map(|(limit, _)| limit);
        let url = self.probe.target().to_string();

        debug!(%url, ?deadline, "waiting for application");

        let (done_tx, done_rx) = oneshot::channel();
        let task = tokio::spawn(probe_until_healthy(
            Arc::clone(&self.probe),
            deadline,
            done_tx,
        ));

        let result = match expires_at {
            Some((_, expires_at)) => {
                tokio::select! {
                    // Checked first so that a probe finishing at the same
                    // instant as the deadline still counts as a timeout.
                    biased;
                    _ = tokio::time::sleep_until(expires_at) => None,
                    done = done_rx => Some(done),
                }
            }
            None => Some(done_rx.await),
        };

        task.abort();

        match result {
            Some(Ok(attempts)) => {
                info!(%url, attempts, elapsed = ?started.elapsed(), "application is healthy");
                Ok(())
            }
            Some(Err(_)) => Err(HealthError::ProbeTaskFailed),
            None => {
                let after = deadline.unwrap_or_default();
                warn!(%url, ?after, "request to application timed out");
                Err(HealthError::DeadlineExceeded { url, after })
            }
        }
    }
}

/// Probe until healthy, then report the number of attempts taken.
///
/// Each request is bounded by `request_timeout`. A failed attempt is logged
/// and followed by [`RETRY_INTERVAL`] of sleep before the next one.
async fn probe_until_healthy<P: Probe>(
    probe: Arc<P>,
    request_timeout: Option<Duration>,
    done: oneshot::Sender<u32>,
) {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match probe.check(request_timeout).await {
            ProbeOutcome::Healthy => {
                // The receiver is gone if the caller already timed out.
                let _ = done.send(attempts);
                return;
            }
            ProbeOutcome::Unhealthy(cause) => {
                warn!(
                    url = %probe.target(),
                    attempt = attempts,
                    error = %cause,
                    retry_in = ?RETRY_INTERVAL,
                    "health probe failed"
                );
                tokio::time::sleep(RETRY_INTERVAL).await;
            }
        }
    }
}
