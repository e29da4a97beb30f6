use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval_at;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::trace;

use super::dispatcher::SyncDispatcher;
use super::notifier::SyncNotifier;
use super::registry::OperatorRegistry;

/// Background loop turning timer ticks and pending signals into dispatch
/// requests.
///
/// ```text
/// Running ──cancel──► ShuttingDown ──task exit──► Stopped
/// ```
///
/// The loop never awaits a sync itself; every sync runs in its own task
/// owned by the [`SyncDispatcher`].
pub(crate) struct SchedulerLoop {
    pub(crate) registry: Arc<OperatorRegistry>,
    pub(crate) notifier: Arc<SyncNotifier>,
    pub(crate) dispatcher: Arc<SyncDispatcher>,
    pub(crate) cancel: CancellationToken,
    pub(crate) sync_interval: Duration,
}

impl SchedulerLoop {
    pub(crate) async fn run(self) {
        info!(
            interval_ms = self.sync_interval.as_millis() as u64,
            "time tick sync inspector started"
        );

        // First sweep one full interval after start, not immediately.
        let mut ticker = interval_at(Instant::now() + self.sync_interval, self.sync_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                // P0: shutdown received
                _ = self.cancel.cancelled() => {
                    info!("time tick sync inspector shutdown signal received");
                    break;
                }

                _ = ticker.tick() => {
                    trace!(channels = self.registry.len(), "periodic time tick sync");
                    self.registry.for_each(|name, _| {
                        self.dispatcher.request_dispatch(name, false);
                    });
                }

                _ = self.notifier.wait_signal() => {
                    let signals = self.notifier.drain_all();
                    debug!(count = signals.len(), "drained time tick sync signals");
                    for (name, persisted) in signals {
                        self.dispatcher.request_dispatch(&name, persisted);
                    }
                }
            }
        }

        info!("time tick sync inspector background loop stopped");
    }
}
