//! Unit normalization for raw battery readings.
//!
//! Everything in here is a pure function of its inputs; the collection layer
//! hands over raw driver values and these turn them into display-ready units.

use std::{fmt::Display, str::FromStr};

use crate::utils::general::saturating_log10;

/// Normalizes a raw `current_now` value into milliamps.
///
/// Many drivers report the value in microamps, others in milliamps, and there
/// is no capability flag to tell them apart. The heuristic: if the order of
/// magnitude is at least 3 (i.e. `|raw| >= 1000`), assume microamps and divide
/// by 1000; otherwise assume the value is already in milliamps.
///
/// A raw value of zero is indistinguishable from "not reported" and returns
/// [`None`]; callers should fall back to [`read_fallback_current`].
///
/// [`read_fallback_current`]: crate::collection::battery::read_fallback_current
pub fn normalize_current(raw: i64) -> Option<f64> {
    if raw != 0 {
        let order_of_magnitude = saturating_log10(raw.abs() as f64).floor() as i32;
        if order_of_magnitude >= 3 {
            Some(raw as f64 / 1000.0)
        } else {
            Some(raw as f64)
        }
    } else {
        None
    }
}

/// Corrects the sign of a current reading so that charging is always a
/// positive inflow and discharging a negative outflow, regardless of which
/// convention the driver uses.
pub fn correct_sign(current_ma: f64, is_charging: bool) -> f64 {
    if (is_charging && current_ma < 0.0) || (!is_charging && current_ma > 0.0) {
        -current_ma
    } else {
        current_ma
    }
}

/// Converts a raw sysfs temperature in tenths of a degree Celsius to degrees.
pub fn tenths_to_celsius(tenths: i32) -> f32 {
    tenths as f32 / 10.0
}

/// The temperature unit used for display and recorded charge history.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum TemperatureType {
    #[default]
    Celsius,
    Fahrenheit,
}

impl FromStr for TemperatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fahrenheit" | "f" => Ok(TemperatureType::Fahrenheit),
            "celsius" | "c" => Ok(TemperatureType::Celsius),
            _ => Err(format!(
                "'{s}' is an invalid temperature type, use one of: [celsius, c, fahrenheit, f]."
            )),
        }
    }
}

impl TemperatureType {
    /// Given a temperature in Celsius, convert it if necessary for a different
    /// unit.
    pub fn convert_temp_unit(&self, celsius: f32) -> f32 {
        match self {
            TemperatureType::Celsius => celsius,
            TemperatureType::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// The unit label, as stored in charge records.
    pub fn unit_label(&self) -> &'static str {
        match self {
            TemperatureType::Celsius => "°C",
            TemperatureType::Fahrenheit => "°F",
        }
    }
}

/// An estimated duration, split into whole hours and leftover minutes.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct TimeEstimate {
    pub hours: i64,
    pub minutes: i64,
}

impl Display for TimeEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

impl TimeEstimate {
    fn from_hours(hours: f64) -> Self {
        let whole = hours.trunc();
        let minutes = ((hours - whole) * 60.0).trunc();

        TimeEstimate {
            hours: whole as i64,
            minutes: minutes as i64,
        }
    }

    fn negated(self) -> Self {
        TimeEstimate {
            hours: -self.hours,
            minutes: -self.minutes,
        }
    }
}

/// Estimates how long the battery will last at the current draw.
///
/// `remaining = pct / 100 * full_capacity`, divided by the instantaneous power
/// `current * voltage`. The result is negated since the corrected current is
/// negative while discharging. Returns [`None`] when the current is zero,
/// where the estimate is undefined.
pub fn estimate_remaining_time(
    percent: f32, current_ma: f64, voltage_v: f64, full_capacity_mah: u32,
) -> Option<TimeEstimate> {
    let denominator = current_ma * voltage_v;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let remaining_capacity = percent as f64 / 100.0 * full_capacity_mah as f64;
    let remaining_time = remaining_capacity / denominator;

    Some(TimeEstimate::from_hours(remaining_time).negated())
}

/// Estimates how long until the battery is full at the current inflow.
///
/// `remaining = (1 - pct / 100) * full_capacity`, divided by the current.
/// Returns [`None`] when the current is zero.
pub fn estimate_charging_time(
    percent: f32, current_ma: f64, full_capacity_mah: u32,
) -> Option<TimeEstimate> {
    if current_ma.abs() < f64::EPSILON {
        return None;
    }

    let remaining_capacity = (1.0 - percent as f64 / 100.0) * full_capacity_mah as f64;
    let charging_time = remaining_capacity / current_ma;

    Some(TimeEstimate::from_hours(charging_time))
}

/// Instantaneous power draw in watts, from milliamps and volts.
pub fn power_watts(current_ma: f64, voltage_v: f64) -> f64 {
    current_ma * voltage_v / 1000.0
}
