//! Battery data collection for Linux platforms.
//!
//! Reads the kernel's power_supply class directly. See
//! <https://www.kernel.org/doc/Documentation/ABI/testing/sysfs-class-power>
//! for the attribute catalogue; not every driver exposes every file, so every
//! read here degrades to [`None`] rather than failing the refresh.

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{BatteryHarvest, BatteryHealth, BatteryStatus, PowerSource};
use crate::constants::FALLBACK_CURRENT_NOW_PATH;

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

#[inline]
fn read_to_string_lossy<P: AsRef<Path>>(path: P) -> Option<String> {
    fs::read(path)
        .map(|v| String::from_utf8_lossy(&v).trim().to_string())
        .ok()
}

#[inline]
fn read_i64<P: AsRef<Path>>(path: P) -> Option<i64> {
    read_to_string_lossy(path).and_then(|s| s.parse().ok())
}

#[inline]
fn read_i32<P: AsRef<Path>>(path: P) -> Option<i32> {
    read_to_string_lossy(path).and_then(|s| s.parse().ok())
}

/// A handle on one battery supply directory, plus the class root so sibling
/// adapter supplies can be checked for the plug source.
#[derive(Debug, Clone)]
pub struct BatterySource {
    root: PathBuf,
    battery: PathBuf,
}

impl BatterySource {
    /// Finds the first supply of type `Battery` under the power_supply class
    /// root. Returns [`None`] when there is no battery (e.g. desktops).
    pub fn detect() -> Option<BatterySource> {
        Self::detect_in(Path::new(POWER_SUPPLY_ROOT))
    }

    fn detect_in(root: &Path) -> Option<BatterySource> {
        let mut batteries: Vec<PathBuf> = root
            .read_dir()
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                matches!(read_to_string_lossy(path.join("type")), Some(ty) if ty == "Battery")
            })
            .collect();

        // Multiple batteries are rare; sorting keeps the pick stable across
        // enumeration order.
        batteries.sort();

        batteries.into_iter().next().map(|battery| BatterySource {
            root: root.to_path_buf(),
            battery,
        })
    }

    /// Takes a fresh raw snapshot of the battery.
    pub fn refresh(&self) -> Option<BatteryHarvest> {
        let status = read_to_string_lossy(self.battery.join("status"))
            .map(|s| BatteryStatus::from_sysfs(&s))
            .unwrap_or_default();

        // charge_now/charge_full give the finest level/scale pair; fall back
        // to the percentage the kernel computed itself.
        let (level, scale) = match (
            read_i64(self.battery.join("charge_now")),
            read_i64(self.battery.join("charge_full")),
        ) {
            (Some(now), Some(full)) if full > 0 => (now, full),
            _ => (read_i64(self.battery.join("capacity"))?, 100),
        };

        let current_raw = read_i64(self.battery.join("current_now")).unwrap_or(0);
        let voltage_mv = read_i64(self.battery.join("voltage_now"))
            .map(|microvolts| (microvolts / 1000) as u32);
        let temperature_tenths = read_i32(self.battery.join("temp"));
        let health = read_to_string_lossy(self.battery.join("health"))
            .map(|s| BatteryHealth::from_sysfs(&s))
            .unwrap_or_default();
        let technology = read_to_string_lossy(self.battery.join("technology"));
        let full_capacity_mah = read_i64(self.battery.join("charge_full"))
            .or_else(|| read_i64(self.battery.join("charge_full_design")))
            .map(|microamp_hours| (microamp_hours / 1000) as u32);

        Some(BatteryHarvest {
            level,
            scale,
            status,
            plug: self.read_plug_source(),
            temperature_tenths,
            current_raw,
            voltage_mv,
            health,
            technology,
            full_capacity_mah,
        })
    }

    /// Scans the battery's sibling supplies for an online adapter.
    fn read_plug_source(&self) -> PowerSource {
        let Ok(read_dir) = self.root.read_dir() else {
            return PowerSource::Battery;
        };

        for entry in read_dir.flatten() {
            let path = entry.path();

            if read_i64(path.join("online")) != Some(1) {
                continue;
            }

            match read_to_string_lossy(path.join("type")).as_deref() {
                Some("Mains") => return PowerSource::Ac,
                // USB subtypes like USB_PD or USB_DCP show up as suffixes.
                Some(ty) if ty.starts_with("USB") => return PowerSource::Usb,
                Some("Wireless") => return PowerSource::Wireless,
                _ => {}
            }
        }

        PowerSource::Battery
    }
}

/// Reads the fixed fallback `current_now` path, which is always in microamps.
/// Malformed or missing content yields [`None`].
pub fn read_fallback_current() -> Option<f64> {
    read_fallback_current_at(Path::new(FALLBACK_CURRENT_NOW_PATH))
}

fn read_fallback_current_at(path: &Path) -> Option<f64> {
    read_i64(path).map(|microamps| microamps as f64 / 1000.0)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    fn write_supply(root: &Path, name: &str, files: &[(&str, &str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, contents) in files {
            fs::write(dir.join(file), format!("{contents}\n")).unwrap();
        }
    }

    #[test]
    fn detects_battery_supply() {
        let tmp = tempfile::tempdir().unwrap();
        write_supply(tmp.path(), "AC", &[("type", "Mains"), ("online", "0")]);
        write_supply(
            tmp.path(),
            "BAT0",
            &[("type", "Battery"), ("capacity", "81"), ("status", "Discharging")],
        );

        let source = BatterySource::detect_in(tmp.path()).unwrap();
        let harvest = source.refresh().unwrap();

        assert_eq!(harvest.percent(), 81.0);
        assert_eq!(harvest.status, BatteryStatus::Discharging);
        assert_eq!(harvest.plug, PowerSource::Battery);
    }

    #[test]
    fn no_battery_on_this_machine() {
        let tmp = tempfile::tempdir().unwrap();
        write_supply(tmp.path(), "AC", &[("type", "Mains"), ("online", "1")]);

        assert!(BatterySource::detect_in(tmp.path()).is_none());
    }

    #[test]
    fn prefers_charge_level_over_capacity() {
        let tmp = tempfile::tempdir().unwrap();
        write_supply(
            tmp.path(),
            "BAT0",
            &[
                ("type", "Battery"),
                ("status", "Charging"),
                ("capacity", "50"),
                ("charge_now", "1600000"),
                ("charge_full", "3200000"),
                ("current_now", "1250000"),
                ("voltage_now", "4200000"),
                ("temp", "305"),
                ("health", "Good"),
                ("technology", "Li-ion"),
            ],
        );

        let harvest = BatterySource::detect_in(tmp.path())
            .unwrap()
            .refresh()
            .unwrap();

        assert_eq!(harvest.percent(), 50.0);
        assert_eq!(harvest.current_raw, 1250000);
        assert_eq!(harvest.voltage_mv, Some(4200));
        assert_eq!(harvest.temperature_tenths, Some(305));
        assert_eq!(harvest.health, BatteryHealth::Good);
        assert_eq!(harvest.technology.as_deref(), Some("Li-ion"));
        assert_eq!(harvest.full_capacity_mah, Some(3200));
    }

    #[test]
    fn reads_plug_source_from_online_sibling() {
        let tmp = tempfile::tempdir().unwrap();
        write_supply(tmp.path(), "AC", &[("type", "Mains"), ("online", "1")]);
        write_supply(
            tmp.path(),
            "BAT0",
            &[("type", "Battery"), ("capacity", "90"), ("status", "Charging")],
        );

        let harvest = BatterySource::detect_in(tmp.path())
            .unwrap()
            .refresh()
            .unwrap();

        assert_eq!(harvest.plug, PowerSource::Ac);
        assert!(harvest.plug.is_plugged());
    }

    #[test]
    fn fallback_current_is_microamps() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("current_now");

        fs::write(&path, "423000\n").unwrap();
        assert_eq!(read_fallback_current_at(&path), Some(423.0));

        fs::write(&path, "not a number\n").unwrap();
        assert_eq!(read_fallback_current_at(&path), None);

        assert_eq!(read_fallback_current_at(&tmp.path().join("missing")), None);
    }
}
