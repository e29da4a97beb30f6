use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use timetick_inspector::PChannelInfo;
use timetick_inspector::TimeTickSyncOperator;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

/// Simulated WAL-side operator: every sync "persists" by bumping a
/// watermark when asked to, and takes `work` of (virtual) time.
pub struct WalChannelOperator {
    channel: PChannelInfo,
    work: Duration,
    calls: Mutex<Vec<bool>>,
    running: AtomicUsize,
    overlaps: AtomicUsize,
    persisted_watermark: AtomicUsize,
    cancelled: AtomicUsize,
}

impl WalChannelOperator {
    pub fn new(
        name: &str,
        work: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            channel: PChannelInfo::new(name, 1),
            work,
            calls: Mutex::new(Vec::new()),
            running: AtomicUsize::new(0),
            overlaps: AtomicUsize::new(0),
            persisted_watermark: AtomicUsize::new(0),
            cancelled: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    pub fn persisted_watermark(&self) -> usize {
        self.persisted_watermark.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeTickSyncOperator for WalChannelOperator {
    fn channel(&self) -> PChannelInfo {
        self.channel.clone()
    }

    async fn sync(
        &self,
        cancel: CancellationToken,
        persisted: bool,
    ) {
        self.calls.lock().push(persisted);
        if self.running.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }

        tokio::select! {
            _ = tokio::time::sleep(self.work) => {
                if persisted {
                    self.persisted_watermark.fetch_add(1, Ordering::SeqCst);
                }
            }
            _ = cancel.cancelled() => {
                self.cancelled.fetch_add(1, Ordering::SeqCst);
            }
        }

        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}
