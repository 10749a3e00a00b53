//! Charge session tracking.
//!
//! A session spans one plug-in to the next plug-out. While a session is live,
//! the tracker accumulates a running average of the charge current and the
//! min/max battery temperature; on plug-out it collapses into a
//! [`ChargeRecord`] for the history store.
//!
//! Timestamps are injected by the caller so the transitions stay pure and
//! testable without a wall clock.

use serde::{Deserialize, Serialize};

/// A finalized charge session. Append-only once written; never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeRecord {
    pub start_percent: i32,
    pub end_percent: i32,
    pub duration_ms: u64,
    pub average_current_ma: f64,
    /// Absent when no sample in the session carried a temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f32>,
    /// The temperature unit label configured when the record was written.
    pub temperature_unit: String,
}

/// Accumulator state for a live session.
#[derive(Clone, Debug)]
struct ActiveSession {
    start_percent: i32,
    start_time_ms: u64,
    current_sum: f64,
    current_count: u32,
    min_temperature: f32,
    max_temperature: f32,
}

impl ActiveSession {
    fn new(start_percent: i32, start_time_ms: u64) -> Self {
        ActiveSession {
            start_percent,
            start_time_ms,
            current_sum: 0.0,
            current_count: 0,
            min_temperature: f32::INFINITY,
            max_temperature: f32::NEG_INFINITY,
        }
    }
}

/// Two-state machine: `Idle` (no session) and `Charging` (one live session).
/// At most one session is live at a time; connect while charging and
/// disconnect while idle are both no-ops.
#[derive(Debug, Default)]
pub struct SessionTracker {
    session: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is currently live.
    pub fn is_charging(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a session. Ignored if one is already live, so a repeated
    /// connect signal can't clobber the accumulators.
    pub fn on_power_connected(&mut self, start_percent: i32, now_ms: u64) {
        if self.session.is_none() {
            self.session = Some(ActiveSession::new(start_percent, now_ms));
        }
    }

    /// Folds one reading into the live session. Unreadable values are skipped
    /// rather than aborting the session; samples while idle are ignored.
    pub fn on_sample(&mut self, current_ma: Option<f64>, temperature: Option<f32>) {
        let Some(session) = &mut self.session else {
            return;
        };

        if let Some(current) = current_ma {
            session.current_sum += current;
            session.current_count += 1;
        }

        if let Some(temperature) = temperature {
            if temperature < session.min_temperature {
                session.min_temperature = temperature;
            }

            if temperature > session.max_temperature {
                session.max_temperature = temperature;
            }
        }
    }

    /// Ends the live session and emits its record. Returns [`None`] while
    /// idle. A session with no current samples averages to 0 rather than
    /// dividing by zero.
    pub fn on_power_disconnected(
        &mut self, end_percent: i32, now_ms: u64, temperature_unit: &str,
    ) -> Option<ChargeRecord> {
        let session = self.session.take()?;

        let average_current_ma = if session.current_count > 0 {
            session.current_sum / f64::from(session.current_count)
        } else {
            0.0
        };

        Some(ChargeRecord {
            start_percent: session.start_percent,
            end_percent,
            duration_ms: now_ms.saturating_sub(session.start_time_ms),
            average_current_ma,
            min_temperature: session.min_temperature.is_finite().then_some(session.min_temperature),
            max_temperature: session.max_temperature.is_finite().then_some(session.max_temperature),
            temperature_unit: temperature_unit.to_string(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_session() {
        let mut tracker = SessionTracker::new();

        tracker.on_power_connected(20, 1_000);
        assert!(tracker.is_charging());

        tracker.on_sample(Some(500.0), Some(10.0));
        tracker.on_sample(Some(700.0), Some(30.0));

        let record = tracker.on_power_disconnected(80, 61_000, "°C").unwrap();

        assert_eq!(record.start_percent, 20);
        assert_eq!(record.end_percent, 80);
        assert_eq!(record.duration_ms, 60_000);
        assert_eq!(record.average_current_ma, 600.0);
        assert_eq!(record.min_temperature, Some(10.0));
        assert_eq!(record.max_temperature, Some(30.0));
        assert_eq!(record.temperature_unit, "°C");
        assert!(!tracker.is_charging());
    }

    #[test]
    fn repeated_connect_is_a_no_op() {
        let mut tracker = SessionTracker::new();

        tracker.on_power_connected(20, 1_000);
        tracker.on_sample(Some(500.0), None);

        // A second connect must not reset the live session.
        tracker.on_power_connected(55, 5_000);

        let record = tracker.on_power_disconnected(80, 2_000, "°C").unwrap();
        assert_eq!(record.start_percent, 20);
        assert_eq!(record.average_current_ma, 500.0);
    }

    #[test]
    fn disconnect_while_idle_is_a_no_op() {
        let mut tracker = SessionTracker::new();
        assert!(tracker.on_power_disconnected(80, 1_000, "°C").is_none());
    }

    #[test]
    fn empty_session_averages_to_zero() {
        let mut tracker = SessionTracker::new();

        tracker.on_power_connected(40, 0);
        let record = tracker.on_power_disconnected(41, 500, "°F").unwrap();

        assert_eq!(record.average_current_ma, 0.0);
        assert_eq!(record.min_temperature, None);
        assert_eq!(record.max_temperature, None);
    }

    #[test]
    fn unreadable_samples_are_skipped() {
        let mut tracker = SessionTracker::new();

        tracker.on_power_connected(10, 0);
        tracker.on_sample(None, Some(25.0));
        tracker.on_sample(Some(900.0), None);
        tracker.on_sample(None, None);

        let record = tracker.on_power_disconnected(50, 1_000, "°C").unwrap();
        assert_eq!(record.average_current_ma, 900.0);
        assert_eq!(record.min_temperature, Some(25.0));
        assert_eq!(record.max_temperature, Some(25.0));
    }

    #[test]
    fn samples_while_idle_are_ignored() {
        let mut tracker = SessionTracker::new();
        tracker.on_sample(Some(500.0), Some(20.0));

        tracker.on_power_connected(10, 0);
        let record = tracker.on_power_disconnected(20, 1_000, "°C").unwrap();
        assert_eq!(record.average_current_ma, 0.0);
    }
}
