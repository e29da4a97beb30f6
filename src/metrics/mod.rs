use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tracing::warn;


lazy_static! {
    pub static ref TIMETICK_SYNC_DISPATCHED: IntCounterVec = IntCounterVec::new(
        Opts::new("timetick_sync_dispatched", "Time tick sync executions launched"),
        &["persisted"]
    )
    .expect("metric can not be created");

    pub static ref TIMETICK_SYNC_SKIPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("timetick_sync_skipped", "Time tick sync requests not executed"),
        &["reason"]
    )
    .expect("metric can not be created");

    pub static ref TIMETICK_SYNC_IN_FLIGHT: IntGauge = IntGauge::new(
        "timetick_sync_in_flight",
        "Channels currently executing a time tick sync"
    )
    .expect("metric can not be created");
}

pub(crate) const SKIP_IN_FLIGHT: &str = "in_flight";
pub(crate) const SKIP_CLOSING: &str = "closing";
pub(crate) const SKIP_UNREGISTERED: &str = "unregistered";

pub fn register_custom_metrics(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(TIMETICK_SYNC_DISPATCHED.clone()))?;
    registry.register(Box::new(TIMETICK_SYNC_SKIPPED.clone()))?;
    registry.register(Box::new(TIMETICK_SYNC_IN_FLIGHT.clone()))?;
    Ok(())
}

/// Render every metric of `registry` in the Prometheus text format.
pub fn encode_metrics(registry: &Registry) -> String {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        warn!("could not encode custom metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_else(|e| {
        warn!("custom metrics could not be from_utf8'd: {}", e);
        String::default()
    })
}

pub(crate) fn record_dispatched(persisted: bool) {
    TIMETICK_SYNC_DISPATCHED
        .with_label_values(&[if persisted { "true" } else { "false" }])
        .inc();
}

pub(crate) fn record_skipped(reason: &str) {
    TIMETICK_SYNC_SKIPPED.with_label_values(&[reason]).inc();
}
