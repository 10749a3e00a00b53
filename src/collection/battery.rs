//! Data collection for battery metrics.
//!
//! For Linux, this is handled by custom code reading the `power_supply` sysfs
//! class. Other platforms get a stub that reports no battery.

use crate::units::normalize_current;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod linux;
        pub use self::linux::*;
    } else {
        pub mod fallback;
        pub use self::fallback::*;
    }
}

/// The reported charging status of the battery.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum BatteryStatus {
    Charging,
    Discharging,
    NotCharging,
    Full,
    #[default]
    Unknown,
}

impl BatteryStatus {
    pub(crate) fn from_sysfs(value: &str) -> Self {
        match value {
            "Charging" => BatteryStatus::Charging,
            "Discharging" => BatteryStatus::Discharging,
            "Not charging" => BatteryStatus::NotCharging,
            "Full" => BatteryStatus::Full,
            _ => BatteryStatus::Unknown,
        }
    }
}

/// Where power is currently coming from.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum PowerSource {
    Ac,
    Usb,
    Wireless,
    /// Running off the battery itself; nothing is plugged in.
    #[default]
    Battery,
}

impl PowerSource {
    /// Return the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerSource::Ac => "AC Charger",
            PowerSource::Usb => "USB Port",
            PowerSource::Wireless => "Wireless Charger",
            PowerSource::Battery => "Battery",
        }
    }

    /// Whether an external power source is connected.
    pub fn is_plugged(&self) -> bool {
        !matches!(self, PowerSource::Battery)
    }
}

/// Reported battery health.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum BatteryHealth {
    Good,
    Overheat,
    Dead,
    OverVoltage,
    UnspecifiedFailure,
    Cold,
    #[default]
    Unknown,
}

impl BatteryHealth {
    pub(crate) fn from_sysfs(value: &str) -> Self {
        match value {
            "Good" => BatteryHealth::Good,
            "Overheat" => BatteryHealth::Overheat,
            "Dead" => BatteryHealth::Dead,
            "Over voltage" => BatteryHealth::OverVoltage,
            "Unspecified failure" => BatteryHealth::UnspecifiedFailure,
            "Cold" => BatteryHealth::Cold,
            _ => BatteryHealth::Unknown,
        }
    }

    /// Return the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryHealth::Good => "Good",
            BatteryHealth::Overheat => "Overheat",
            BatteryHealth::Dead => "Dead",
            BatteryHealth::OverVoltage => "Over Voltage",
            BatteryHealth::UnspecifiedFailure => "Unspecified Failure",
            BatteryHealth::Cold => "Cold",
            BatteryHealth::Unknown => "Unknown",
        }
    }
}

/// One raw snapshot of the battery, straight from the platform. Values keep
/// their driver units; normalization happens in [`crate::units`].
#[derive(Clone, Debug, Default)]
pub struct BatteryHarvest {
    /// Raw charge level. Together with `scale` this yields a percentage.
    pub level: i64,
    /// The full-scale value `level` is measured against.
    pub scale: i64,
    pub status: BatteryStatus,
    pub plug: PowerSource,
    /// Battery temperature in tenths of a degree Celsius.
    pub temperature_tenths: Option<i32>,
    /// Raw `current_now` value in driver-defined units; 0 means unreported.
    pub current_raw: i64,
    /// Battery voltage in millivolts.
    pub voltage_mv: Option<u32>,
    pub health: BatteryHealth,
    /// Battery chemistry, e.g. "Li-ion".
    pub technology: Option<String>,
    /// Full battery capacity in mAh, if the driver exposes it.
    pub full_capacity_mah: Option<u32>,
}

impl BatteryHarvest {
    /// Current charge percent.
    pub fn percent(&self) -> f32 {
        if self.scale > 0 {
            self.level as f32 / self.scale as f32 * 100.0
        } else {
            0.0
        }
    }

    /// Whether the battery counts as charging. `Full` counts, matching how a
    /// plugged-in device at 100% should still read as externally powered.
    pub fn is_charging(&self) -> bool {
        matches!(self.status, BatteryStatus::Charging | BatteryStatus::Full)
    }
}

/// Resolves the instantaneous current in milliamps for a harvest, applying the
/// unit heuristic and falling back to the fixed sysfs path when the driver
/// reported nothing. The sign is left as reported; see
/// [`crate::units::correct_sign`].
pub fn resolve_current(harvest: &BatteryHarvest) -> Option<f64> {
    normalize_current(harvest.current_raw).or_else(read_fallback_current)
}
