use std::sync::Arc;
use std::time::Duration;

use timetick_inspector::DefaultTimeTickSyncInspector;
use timetick_inspector::InspectorConfig;
use timetick_inspector::TimeTickSyncInspector;
use timetick_inspector::TimeTickSyncOperator;
use tokio::time::sleep;

use crate::common::enable_logger;
use crate::common::WalChannelOperator;

fn config(sync_interval_ms: u64) -> InspectorConfig {
    InspectorConfig { sync_interval_ms }
}

#[tokio::test(start_paused = true)]
async fn test_wal_open_sync_close_lifecycle() {
    enable_logger();
    let inspector = DefaultTimeTickSyncInspector::new(&config(200));
    let channels: Vec<_> = (0..4)
        .map(|i| WalChannelOperator::new(&format!("by-dev-rootcoord-dml_{i}"), Duration::from_millis(5)))
        .collect();
    for channel in &channels {
        inspector.register_sync_operator(channel.clone());
    }

    // Fresh writes on channel 0 ask for a durable watermark right away.
    inspector.trigger_sync(&channels[0].channel(), true);
    sleep(Duration::from_millis(50)).await;
    assert_eq!(channels[0].calls(), vec![true]);
    assert_eq!(channels[0].persisted_watermark(), 1);
    for channel in &channels[1..] {
        assert_eq!(channel.call_count(), 0);
    }

    // Two sweeps (200ms, 400ms) reach every channel without persisting.
    sleep(Duration::from_millis(400)).await;
    for channel in &channels {
        assert!(channel.calls().iter().filter(|p| !**p).count() >= 2);
        assert_eq!(channel.overlaps(), 0);
    }

    // Channel close: no further syncs for it.
    inspector.unregister_sync_operator(channels[3].as_ref());
    let before = channels[3].call_count();
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(channels[3].call_count(), before);

    inspector.close().await;
    assert!(inspector.is_closed());
    assert_eq!(inspector.in_flight_count(), 0);

    let counts: Vec<_> = channels.iter().map(|c| c.call_count()).collect();
    sleep(Duration::from_millis(1000)).await;
    let after: Vec<_> = channels.iter().map(|c| c.call_count()).collect();
    assert_eq!(counts, after, "no sync may start after close");
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_long_running_sync() {
    enable_logger();
    let inspector = DefaultTimeTickSyncInspector::new(&config(3_600_000));
    let slow = WalChannelOperator::new("slow", Duration::from_secs(3600));
    inspector.register_sync_operator(slow.clone());

    inspector.trigger_sync(&slow.channel(), true);
    sleep(Duration::from_millis(10)).await;
    assert_eq!(inspector.in_flight_count(), 1);

    inspector.close().await;

    assert_eq!(slow.cancelled(), 1);
    assert_eq!(slow.persisted_watermark(), 0);
    assert_eq!(inspector.in_flight_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_write_storm_keeps_one_sync_per_channel() {
    enable_logger();
    let inspector = DefaultTimeTickSyncInspector::new(&config(10));
    let channels: Vec<_> = (0..3)
        .map(|i| WalChannelOperator::new(&format!("pchannel-{i}"), Duration::from_millis(2)))
        .collect();
    for channel in &channels {
        inspector.register_sync_operator(channel.clone());
    }

    let writers: Vec<_> = (0..12)
        .map(|w| {
            let inspector: Arc<DefaultTimeTickSyncInspector> = inspector.clone();
            let channel = channels[w % channels.len()].channel();
            tokio::spawn(async move {
                for n in 0..100 {
                    inspector.trigger_sync(&channel, n % 10 == 0);
                    if n % 7 == 0 {
                        sleep(Duration::from_millis(1)).await;
                    }
                }
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap();
    }
    sleep(Duration::from_millis(50)).await;
    inspector.close().await;

    for channel in &channels {
        assert!(channel.call_count() >= 1);
        assert_eq!(channel.overlaps(), 0);
    }
    assert_eq!(inspector.in_flight_count(), 0);
}
