//! # timetick-inspector
//!
//! Time tick synchronization inspector for the write-ahead-log layer of a
//! streaming node.
//!
//! Every physical channel (pchannel) of the WAL periodically needs its time
//! tick watermark synchronized so downstream consumers can cut a consistent
//! read. The inspector collects per-channel sync requests, merges repeated
//! requests, and runs at most one sync per channel at a time.
//!
//! ## Key Traits
//!
//! - [`TimeTickSyncOperator`] - per-channel sync supplied by the WAL layer
//! - [`TimeTickSyncInspector`] - trigger, register and shutdown API
//!
//! ## Example
//! ```ignore
//! let config = TimeTickConfig::new()?.validate()?;
//! let inspector = DefaultTimeTickSyncInspector::new(&config.inspector);
//!
//! inspector.register_sync_operator(operator.clone());
//! inspector.trigger_sync(&operator.channel(), true);
//!
//! inspector.unregister_sync_operator(operator.as_ref());
//! inspector.close().await;
//! ```

mod channel;
mod config;
mod errors;
mod inspector;
mod metrics;
mod operator;

pub use channel::*;
pub use config::*;
pub use errors::*;
pub use inspector::*;
pub use metrics::*;
pub use operator::*;


//-----------------------------------------------------------
// Test utils
