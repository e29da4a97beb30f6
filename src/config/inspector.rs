use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Time tick sync inspector configuration
///
/// ```toml
/// [inspector]
/// sync_interval_ms = 200
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InspectorConfig {
    /// Period of the full sweep that syncs every registered channel
    /// with `persisted = false`.
    ///
    /// Range: 1-3600000 (1ms to 1 hour)
    /// Default: 200 (the proxy time tick interval)
    #[serde(default = "default_sync_interval_ms")]
    pub sync_interval_ms: u64,
}

fn default_sync_interval_ms() -> u64 {
    200
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            sync_interval_ms: default_sync_interval_ms(),
        }
    }
}

impl InspectorConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }

    /// Returns error if `sync_interval_ms` is out of range (1-3600000)
    pub fn validate(&self) -> Result<()> {
        // A zero period would panic inside the ticker
        if !(1..=3_600_000).contains(&self.sync_interval_ms) {
            return Err(Error::Config(ConfigError::Message(format!(
                "inspector sync_interval_ms must be between 1 and 3600000, got {}",
                self.sync_interval_ms
            ))));
        }
        Ok(())
    }
}
