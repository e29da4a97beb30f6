use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dashmap::DashSet;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::registry::OperatorRegistry;
use crate::metrics;
use crate::metrics::TIMETICK_SYNC_IN_FLIGHT;

/// Launches one tracked task per channel sync and drops requests for
/// channels that already have a sync running.
pub(crate) struct SyncDispatcher {
    registry: Arc<OperatorRegistry>,
    working: Arc<DashSet<String>>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl SyncDispatcher {
    pub(crate) fn new(
        registry: Arc<OperatorRegistry>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry,
            working: Arc::new(DashSet::new()),
            tracker: TaskTracker::new(),
            cancel,
        }
    }

    /// Returns `true` if a sync task was launched. The task may still skip
    /// the sync if the inspector closes or the operator is unregistered
    /// before it runs.
    ///
    /// A request for a channel that is already in flight is dropped, not
    /// queued; the periodic sweep or a later trigger picks it up again.
    pub(crate) fn request_dispatch(
        &self,
        channel_name: &str,
        persisted: bool,
    ) -> bool {
        if self.cancel.is_cancelled() {
            trace!(channel = channel_name, "inspector closing, sync dropped");
            metrics::record_skipped(metrics::SKIP_CLOSING);
            return false;
        }

        let Some(guard) = InFlightGuard::acquire(&self.working, channel_name) else {
            debug!(channel = channel_name, persisted, "sync already in flight, skipped");
            metrics::record_skipped(metrics::SKIP_IN_FLIGHT);
            return false;
        };

        debug!(channel = channel_name, persisted, "dispatch time tick sync");

        let registry = self.registry.clone();
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            if cancel.is_cancelled() {
                trace!(channel = guard.channel(), "inspector closing, sync dropped");
                metrics::record_skipped(metrics::SKIP_CLOSING);
                return;
            }
            match registry.get(guard.channel()) {
                Some(operator) => {
                    metrics::record_dispatched(persisted);
                    let outcome = AssertUnwindSafe(operator.sync(cancel, persisted))
                        .catch_unwind()
                        .await;
                    if outcome.is_err() {
                        warn!(channel = guard.channel(), persisted, "time tick sync panicked");
                    }
                }
                None => {
                    // Unregistered between drain and execution.
                    trace!(channel = guard.channel(), "sync operator gone, skipped");
                    metrics::record_skipped(metrics::SKIP_UNREGISTERED);
                }
            }
        });
        true
    }

    pub(crate) fn in_flight_count(&self) -> usize {
        self.working.len()
    }

    /// Stops accepting new tasks and waits for every launched one to return.
    pub(crate) async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

/// Membership of one channel in the in-flight set.
struct InFlightGuard {
    working: Arc<DashSet<String>>,
    channel: String,
}

impl InFlightGuard {
    fn acquire(
        working: &Arc<DashSet<String>>,
        channel_name: &str,
    ) -> Option<Self> {
        if !working.insert(channel_name.to_string()) {
            return None;
        }
        TIMETICK_SYNC_IN_FLIGHT.inc();
        Some(Self {
            working: working.clone(),
            channel: channel_name.to_string(),
        })
    }

    fn channel(&self) -> &str {
        &self.channel
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.working.remove(&self.channel);
        TIMETICK_SYNC_IN_FLIGHT.dec();
    }
}
