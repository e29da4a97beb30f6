//! Time tick sync inspector.
//!
//! Decouples the WAL write path from time tick synchronization: writers
//! report activity through [`TimeTickSyncInspector::trigger_sync`] without
//! blocking, and one background loop turns those signals (plus a periodic
//! sweep) into at most one running sync per physical channel.
//!
//! ```text
//!  trigger_sync ──► SyncNotifier ──wake──┐
//!                                        ▼
//!  interval tick ─────────────────► SchedulerLoop ──► SyncDispatcher
//!                                                        │ in-flight set
//!                                                        ▼
//!                                  OperatorRegistry ──► operator.sync(cancel, persisted)
//! ```
mod dispatcher;
mod notifier;
mod registry;
mod scheduler;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;

use self::dispatcher::SyncDispatcher;
use self::notifier::SyncNotifier;
use self::registry::OperatorRegistry;
use self::scheduler::SchedulerLoop;
use crate::InspectorConfig;
use crate::PChannelInfo;
use crate::TimeTickSyncOperator;

const MIN_SYNC_INTERVAL: Duration = Duration::from_millis(1);

#[async_trait]
pub trait TimeTickSyncInspector: Send + Sync + 'static {
    /// Requests a sync of `channel`. Never blocks; repeated triggers before
    /// the next drain merge their `persisted` flags with logical OR.
    fn trigger_sync(
        &self,
        channel: &PChannelInfo,
        persisted: bool,
    );

    /// # Panics
    /// With an [`InvariantViolation::DuplicateOperator`](crate::InvariantViolation)
    /// payload if the channel already has an operator.
    fn register_sync_operator(
        &self,
        operator: Arc<dyn TimeTickSyncOperator>,
    );

    /// # Panics
    /// With an [`InvariantViolation::OperatorNotFound`](crate::InvariantViolation)
    /// payload if the channel has no operator.
    fn unregister_sync_operator(
        &self,
        operator: &dyn TimeTickSyncOperator,
    );

    /// For callers that registered the channel earlier.
    ///
    /// # Panics
    /// With an [`InvariantViolation::OperatorNotFound`](crate::InvariantViolation)
    /// payload if the channel has no operator.
    fn must_get_operator(
        &self,
        channel: &PChannelInfo,
    ) -> Arc<dyn TimeTickSyncOperator>;

    /// Stops the background loop and waits for every launched sync to return.
    async fn close(&self);
}

pub struct DefaultTimeTickSyncInspector {
    registry: Arc<OperatorRegistry>,
    notifier: Arc<SyncNotifier>,
    dispatcher: Arc<SyncDispatcher>,
    cancel: CancellationToken,
    background: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for DefaultTimeTickSyncInspector {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("DefaultTimeTickSyncInspector")
            .field("registered", &self.registry.len())
            .field("in_flight", &self.dispatcher.in_flight_count())
            .field("closed", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl DefaultTimeTickSyncInspector {
    /// Creates the inspector and starts its background loop right away.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &InspectorConfig) -> Arc<Self> {
        let registry = Arc::new(OperatorRegistry::new());
        let notifier = Arc::new(SyncNotifier::new());
        let cancel = CancellationToken::new();
        let dispatcher = Arc::new(SyncDispatcher::new(registry.clone(), cancel.clone()));

        let scheduler = SchedulerLoop {
            registry: registry.clone(),
            notifier: notifier.clone(),
            dispatcher: dispatcher.clone(),
            cancel: cancel.clone(),
            // A zero period would panic the ticker.
            sync_interval: config.sync_interval().max(MIN_SYNC_INTERVAL),
        };
        let handle = tokio::spawn(scheduler.run());

        Arc::new(Self {
            registry,
            notifier,
            dispatcher,
            cancel,
            background: Mutex::new(Some(handle)),
        })
    }

    /// Names of every registered channel, unordered.
    pub fn registered_channels(&self) -> Vec<String> {
        self.registry.channel_names()
    }

    /// Channels with a sync currently running.
    pub fn in_flight_count(&self) -> usize {
        self.dispatcher.in_flight_count()
    }

    /// Channels with a signal waiting for the next drain.
    pub fn pending_signal_count(&self) -> usize {
        self.notifier.pending_len()
    }

    /// `true` once `close()` has begun.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for DefaultTimeTickSyncInspector {
    fn drop(&mut self) {
        // Stop the loop even if close() was never awaited.
        self.cancel.cancel();
    }
}

#[async_trait]
impl TimeTickSyncInspector for DefaultTimeTickSyncInspector {
    fn trigger_sync(
        &self,
        channel: &PChannelInfo,
        persisted: bool,
    ) {
        self.notifier.add_and_notify(&channel.name, persisted);
    }

    fn register_sync_operator(
        &self,
        operator: Arc<dyn TimeTickSyncOperator>,
    ) {
        if let Err(violation) = self.registry.try_register(operator) {
            violation.raise();
        }
    }

    fn unregister_sync_operator(
        &self,
        operator: &dyn TimeTickSyncOperator,
    ) {
        if let Err(violation) = self.registry.try_unregister(&operator.channel().name) {
            violation.raise();
        }
    }

    fn must_get_operator(
        &self,
        channel: &PChannelInfo,
    ) -> Arc<dyn TimeTickSyncOperator> {
        self.registry
            .must_get(&channel.name)
            .unwrap_or_else(|violation| violation.raise())
    }

    async fn close(&self) {
        self.cancel.cancel();

        // Held across the join so a concurrent close() also waits for the loop.
        let mut background = self.background.lock().await;
        if let Some(handle) = background.take() {
            if let Err(e) = handle.await {
                error!("time tick sync inspector loop exited abnormally: {:?}", e);
            }
        }
        drop(background);

        self.dispatcher.shutdown().await;
        info!("time tick sync inspector closed");
    }
}
