//! A headless battery telemetry monitor for Linux.
//!
//! batwatch polls the power_supply sysfs class for raw battery readings,
//! derives normalized metrics (current in mA, temperature, power draw, time
//! estimates), tracks charge sessions between plug-in and plug-out, and
//! optionally appends charge records and periodic current samples to disk.

#![warn(rust_2018_idioms)]

pub mod utils {
    pub mod error;
    pub mod general;
    pub mod logging;
}
pub mod app;
pub mod collection;
pub mod constants;
pub mod data_conversion;
pub mod event;
pub mod history;
pub mod options;
pub mod units;
