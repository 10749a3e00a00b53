//! Main application state and event handling.
//!
//! All mutation happens here, driven by events from the main loop; the worker
//! threads only produce events. That keeps the whole thing a single logical
//! writer, which the history files depend on.

pub mod session;

use log::{debug, info, warn};

use crate::{
    collection::{
        battery::{resolve_current, read_fallback_current, BatterySource},
        epoch_millis, Data,
    },
    data_conversion::convert_battery_harvest,
    history::{ChargeHistory, SampleLog},
    options::AdapterVoltage,
    units::{self, TemperatureType},
};

use session::SessionTracker;

/// Settings that affect how data is displayed and recorded.
#[derive(Clone, Debug)]
pub struct AppConfigFields {
    pub update_rate_in_milliseconds: u64,
    pub temperature_type: TemperatureType,
    pub adapter_voltage: AdapterVoltage,
    /// Whether the per-refresh status line is printed.
    pub show_status: bool,
    pub history_enabled: bool,
    pub sample_interval_in_milliseconds: u64,
    pub sample_retention: Option<usize>,
}

pub struct App {
    pub app_config_fields: AppConfigFields,
    data: Data,
    /// Plug state from the previous snapshot, used to derive connect and
    /// disconnect transitions. `None` until the first snapshot lands.
    was_plugged: Option<bool>,
    tracker: SessionTracker,
    /// A second read-only handle on the battery, for fresh per-second session
    /// samples; the collection snapshot may be older than a second at slow
    /// refresh rates.
    session_source: Option<BatterySource>,
    charge_history: ChargeHistory,
    sample_log: SampleLog,
}

impl App {
    pub fn new(
        app_config_fields: AppConfigFields, charge_history: ChargeHistory, sample_log: SampleLog,
        session_source: Option<BatterySource>,
    ) -> Self {
        App {
            app_config_fields,
            data: Data::default(),
            was_plugged: None,
            tracker: SessionTracker::new(),
            session_source,
            charge_history,
            sample_log,
        }
    }

    /// Whether a charge session is currently live.
    pub fn is_charging_session_live(&self) -> bool {
        self.tracker.is_charging()
    }

    /// Eats a fresh snapshot: derives plug transitions, finalizes or starts
    /// sessions, and prints the status line.
    pub fn on_update(&mut self, data: Box<Data>) {
        self.data = *data;

        let Some(harvest) = self.data.battery.clone() else {
            debug!("no battery reading this round");
            return;
        };

        let now_ms = self.data.collected_at_ms;
        let plugged = harvest.plug.is_plugged();
        let percent = harvest.percent() as i32;

        match self.was_plugged {
            Some(false) if plugged => {
                debug!("power connected at {percent}%");
                self.tracker.on_power_connected(percent, now_ms);
            }
            Some(true) if !plugged => {
                debug!("power disconnected at {percent}%");
                let unit = self.app_config_fields.temperature_type.unit_label();
                if let Some(record) = self.tracker.on_power_disconnected(percent, now_ms, unit) {
                    self.persist_charge_record(&record);
                }
            }
            _ => {}
        }
        self.was_plugged = Some(plugged);

        if self.app_config_fields.show_status {
            let current_ma = resolve_current(&harvest)
                .map(|current| units::correct_sign(current, harvest.is_charging()));
            let converted =
                convert_battery_harvest(&harvest, current_ma, &self.app_config_fields);
            println!("{}", converted.status_line());
        }
    }

    /// Feeds one fresh reading into the live session, if any. Unreadable
    /// values are skipped; the session carries on.
    pub fn on_session_tick(&mut self) {
        if !self.tracker.is_charging() {
            return;
        }

        let harvest = self
            .session_source
            .as_ref()
            .and_then(|source| source.refresh());

        let (current_ma, temperature) = match &harvest {
            Some(harvest) => {
                let current = resolve_current(harvest)
                    .map(|current| units::correct_sign(current, harvest.is_charging()));
                let temperature = harvest.temperature_tenths.map(|tenths| {
                    self.app_config_fields
                        .temperature_type
                        .convert_temp_unit(units::tenths_to_celsius(tenths))
                });
                (current, temperature)
            }
            None => (None, None),
        };

        self.tracker.on_sample(current_ma, temperature);
    }

    /// Appends one current sample to the sample log. The sample is the raw
    /// normalized current without sign correction, 0 when unreadable.
    pub fn on_history_tick(&mut self) {
        if !self.app_config_fields.history_enabled {
            return;
        }

        let current_ma = self
            .session_source
            .as_ref()
            .and_then(|source| source.refresh())
            .as_ref()
            .and_then(resolve_current)
            .or_else(read_fallback_current)
            .unwrap_or(0.0)
            .round() as i64;

        match self.sample_log.append(epoch_millis(), current_ma) {
            Ok(()) => info!(
                "history updated: sample appended to {:?}",
                self.sample_log.path()
            ),
            Err(err) => warn!("failed to append current sample: {err}"),
        }
    }

    fn persist_charge_record(&mut self, record: &session::ChargeRecord) {
        if !self.app_config_fields.history_enabled {
            return;
        }

        match self.charge_history.append(record) {
            Ok(count) => info!("history updated: {count} charge records stored"),
            Err(err) => warn!("failed to store charge record: {err}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::collection::battery::{BatteryHarvest, BatteryStatus, PowerSource};

    fn config(history_enabled: bool) -> AppConfigFields {
        AppConfigFields {
            update_rate_in_milliseconds: 1000,
            temperature_type: TemperatureType::Celsius,
            adapter_voltage: AdapterVoltage::default(),
            show_status: false,
            history_enabled,
            sample_interval_in_milliseconds: 1000,
            sample_retention: None,
        }
    }

    fn app(dir: &std::path::Path, history_enabled: bool) -> App {
        App::new(
            config(history_enabled),
            ChargeHistory::new(dir.join("charge_history.json")),
            SampleLog::new(dir.join("battery_history.txt"), None),
            None,
        )
    }

    fn snapshot(percent: i64, plug: PowerSource, at_ms: u64) -> Box<Data> {
        Box::new(Data {
            collection_time: std::time::Instant::now(),
            collected_at_ms: at_ms,
            battery: Some(BatteryHarvest {
                level: percent,
                scale: 100,
                status: if plug.is_plugged() {
                    BatteryStatus::Charging
                } else {
                    BatteryStatus::Discharging
                },
                plug,
                ..Default::default()
            }),
        })
    }

    #[test]
    fn plug_transition_starts_and_ends_a_session() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path(), true);

        app.on_update(snapshot(50, PowerSource::Battery, 1_000));
        assert!(!app.is_charging_session_live());

        app.on_update(snapshot(50, PowerSource::Ac, 2_000));
        assert!(app.is_charging_session_live());

        // Staying plugged must not restart the session.
        app.on_update(snapshot(60, PowerSource::Ac, 3_000));
        assert!(app.is_charging_session_live());

        app.on_update(snapshot(80, PowerSource::Battery, 62_000));
        assert!(!app.is_charging_session_live());

        let records = ChargeHistory::new(tmp.path().join("charge_history.json"))
            .load()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_percent, 50);
        assert_eq!(records[0].end_percent, 80);
        assert_eq!(records[0].duration_ms, 60_000);
    }

    #[test]
    fn already_plugged_at_startup_does_not_start_a_session() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path(), true);

        app.on_update(snapshot(50, PowerSource::Ac, 1_000));
        assert!(!app.is_charging_session_live());
    }

    #[test]
    fn records_are_not_persisted_when_history_is_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path(), false);

        app.on_update(snapshot(50, PowerSource::Battery, 1_000));
        app.on_update(snapshot(50, PowerSource::Usb, 2_000));
        app.on_update(snapshot(70, PowerSource::Battery, 3_000));

        assert!(ChargeHistory::new(tmp.path().join("charge_history.json"))
            .load()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn history_tick_appends_one_sample() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path(), true);

        app.on_history_tick();
        app.on_history_tick();

        let samples = SampleLog::new(tmp.path().join("battery_history.txt"), None)
            .load()
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples[0].timestamp_ms > 0);
    }
}
