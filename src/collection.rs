//! This is the main file to house data collection functions.

pub mod battery;

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use battery::{BatteryHarvest, BatterySource};

/// Milliseconds since the Unix epoch, for timestamps that outlive the process.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// One round of collected data.
#[derive(Clone, Debug)]
pub struct Data {
    pub collection_time: Instant,
    /// Wall-clock collection time, used for persisted records.
    pub collected_at_ms: u64,
    pub battery: Option<BatteryHarvest>,
}

impl Default for Data {
    fn default() -> Self {
        Data {
            collection_time: Instant::now(),
            collected_at_ms: 0,
            battery: None,
        }
    }
}

/// Polls the battery source and packages snapshots for the main loop.
#[derive(Debug)]
pub struct DataCollector {
    pub data: Data,
    source: Option<BatterySource>,
}

impl DataCollector {
    pub fn new() -> Self {
        DataCollector {
            data: Data::default(),
            source: BatterySource::detect(),
        }
    }

    /// Whether a battery was found at startup.
    pub fn has_battery(&self) -> bool {
        self.source.is_some()
    }

    /// Update and refresh data.
    pub fn update_data(&mut self) {
        self.data.collection_time = Instant::now();
        self.data.collected_at_ms = epoch_millis();
        self.data.battery = self.source.as_ref().and_then(|source| source.refresh());
    }
}

impl Default for DataCollector {
    fn default() -> Self {
        Self::new()
    }
}
