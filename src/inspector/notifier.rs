//! Pending sync signal accumulator.
//!
//! Writers merge a `persisted` flag per channel and poke a single-permit
//! [`Notify`]. The scheduler loop waits on that permit and then drains the
//! whole map, so any number of notifications between two drains collapse
//! into one wake-up without losing a channel.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct SyncNotifier {
    pending: Mutex<HashMap<String, bool>>,
    notify: Notify,
}

impl SyncNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Never blocks on the consumer. Once a channel is pending with
    /// `persisted = true` it stays `true` until drained.
    pub(crate) fn add_and_notify(
        &self,
        channel_name: &str,
        persisted: bool,
    ) {
        {
            let mut pending = self.pending.lock();
            match pending.get_mut(channel_name) {
                Some(flag) => *flag |= persisted,
                None => {
                    pending.insert(channel_name.to_string(), persisted);
                }
            }
        }
        // Insert happens-before notify: a drain that misses this entry
        // leaves the permit for the next wake-up.
        self.notify.notify_one();
    }

    /// Completes once at least one signal was added since the last wake-up.
    pub(crate) fn wait_signal(&self) -> Notified<'_> {
        self.notify.notified()
    }

    pub(crate) fn drain_all(&self) -> HashMap<String, bool> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }
}
