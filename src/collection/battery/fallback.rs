//! Stub battery source for platforms without power_supply sysfs support.

use super::BatteryHarvest;

#[derive(Debug, Clone)]
pub struct BatterySource;

impl BatterySource {
    pub fn detect() -> Option<BatterySource> {
        None
    }

    pub fn refresh(&self) -> Option<BatteryHarvest> {
        None
    }
}

pub fn read_fallback_current() -> Option<f64> {
    None
}
