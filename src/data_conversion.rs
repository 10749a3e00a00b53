//! This module is used to convert harvested data into a displayable form.
//!
//! Everything here is pure: the caller resolves the instantaneous current
//! (which may touch the fallback sysfs path) before conversion.

use itertools::Itertools;

use crate::{
    app::AppConfigFields,
    collection::battery::BatteryHarvest,
    units::{self, TimeEstimate},
};

const UNKNOWN: &str = "Unknown";

/// Display-ready battery metrics, derived fresh from every snapshot and never
/// persisted.
#[derive(Clone, Debug, Default)]
pub struct ConvertedBatteryData {
    pub percent: f32,
    pub is_charging: bool,
    pub percent_label: String,
    pub current_label: String,
    pub voltage_label: String,
    pub temperature_label: String,
    pub power_label: String,
    /// Time to full while charging, time to empty otherwise.
    pub time_label: String,
    pub source_label: &'static str,
    pub health_label: &'static str,
    pub capacity_label: String,
    pub full_capacity_label: String,
    pub technology_label: String,
}

impl ConvertedBatteryData {
    /// One-line summary of the reading, used for the status line.
    pub fn status_line(&self) -> String {
        let time_label = if self.is_charging {
            format!("{} to full", self.time_label)
        } else {
            format!("{} remaining", self.time_label)
        };

        [
            self.percent_label.as_str(),
            self.source_label,
            self.current_label.as_str(),
            self.voltage_label.as_str(),
            self.temperature_label.as_str(),
            self.power_label.as_str(),
            time_label.as_str(),
            self.health_label,
        ]
        .iter()
        .join(" | ")
    }
}

/// Converts one raw snapshot plus the already-resolved, sign-corrected current
/// into display values. Anything unreadable degrades to "Unknown".
pub fn convert_battery_harvest(
    harvest: &BatteryHarvest, current_ma: Option<f64>, settings: &AppConfigFields,
) -> ConvertedBatteryData {
    let percent = harvest.percent();
    let is_charging = harvest.is_charging();
    let voltage_v = harvest.voltage_mv.map(|mv| f64::from(mv) / 1000.0);

    let current_label = match current_ma {
        Some(current) => format!("{current:.0} mA"),
        None => UNKNOWN.to_string(),
    };

    let voltage_label = match voltage_v {
        Some(voltage) => format!("{voltage:.2} V"),
        None => UNKNOWN.to_string(),
    };

    let temperature_label = match harvest.temperature_tenths {
        Some(tenths) => {
            let converted = settings
                .temperature_type
                .convert_temp_unit(units::tenths_to_celsius(tenths));
            format!("{converted:.1} {}", settings.temperature_type.unit_label())
        }
        None => UNKNOWN.to_string(),
    };

    // While charging the battery voltage reads as the charge voltage, so the
    // configured adapter voltage is the better estimate of input power.
    let power_voltage = if is_charging {
        Some(settings.adapter_voltage.volts())
    } else {
        voltage_v
    };
    let power_label = match (current_ma, power_voltage) {
        (Some(current), Some(voltage)) => {
            format!("{:.2} W", units::power_watts(current, voltage))
        }
        _ => UNKNOWN.to_string(),
    };

    let time_estimate: Option<TimeEstimate> = match (current_ma, harvest.full_capacity_mah) {
        (Some(current), Some(full)) => {
            if is_charging {
                units::estimate_charging_time(percent, current, full)
            } else {
                voltage_v
                    .and_then(|voltage| units::estimate_remaining_time(percent, current, voltage, full))
            }
        }
        _ => None,
    };
    let time_label = match time_estimate {
        Some(estimate) => estimate.to_string(),
        None => UNKNOWN.to_string(),
    };

    let capacity_label = match harvest.full_capacity_mah {
        Some(full) => format!("~ {} mAh", (full as f32 * percent / 100.0) as u32),
        None => UNKNOWN.to_string(),
    };

    let full_capacity_label = match harvest.full_capacity_mah {
        Some(full) => format!("{full} mAh"),
        None => UNKNOWN.to_string(),
    };

    ConvertedBatteryData {
        percent,
        is_charging,
        percent_label: format!("{}%", percent as i32),
        current_label,
        voltage_label,
        temperature_label,
        power_label,
        time_label,
        source_label: harvest.plug.as_str(),
        health_label: harvest.health.as_str(),
        capacity_label,
        full_capacity_label,
        technology_label: harvest
            .technology
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}
