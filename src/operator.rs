use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::PChannelInfo;

/// Per-channel unit that computes (and optionally persists) the time tick
/// watermark of one physical channel.
///
/// Supplied by the WAL layer when a channel is opened. The inspector calls
/// [`sync`](TimeTickSyncOperator::sync) from its own background tasks and
/// never runs two calls for the same channel concurrently.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TimeTickSyncOperator: Send + Sync + 'static {
    /// Channel this operator is bound to.
    fn channel(&self) -> PChannelInfo;

    /// Synchronize the time tick of the channel.
    ///
    /// `persisted = true` requires the watermark to be durably recorded.
    /// Implementations must return promptly once `cancel` fires; the
    /// inspector's `close()` waits for every in-flight call.
    async fn sync(
        &self,
        cancel: CancellationToken,
        persisted: bool,
    );
}
