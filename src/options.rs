//! Options — reading the config file and merging it with CLI arguments.

pub mod args;

use std::{
    fs,
    io::Write,
    path::PathBuf,
    str::FromStr,
};

use serde::Deserialize;

use crate::{
    app::AppConfigFields,
    constants::{
        CHARGE_HISTORY_FILE_NAME, DEFAULT_CONFIG_FILE_LOCATION, DEFAULT_CONFIG_CONTENT,
        DEFAULT_HISTORY_DIR_NAME, DEFAULT_SAMPLE_INTERVAL_IN_MILLISECONDS,
        DEFAULT_UPDATE_RATE_IN_MILLISECONDS, MIN_UPDATE_RATE_IN_MILLISECONDS,
        SAMPLE_LOG_FILE_NAME,
    },
    units::TemperatureType,
    utils::{
        error::{self, BatwatchError},
        general::ClampExt,
    },
};

use args::BatwatchArgs;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    pub flags: Option<ConfigFlags>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConfigFlags {
    pub rate: Option<StringOrNum>,
    pub temperature_type: Option<String>,
    pub adapter_voltage: Option<String>,
    pub notification: Option<bool>,
    pub history: Option<bool>,
    pub history_dir: Option<String>,
    pub sample_interval: Option<StringOrNum>,
    pub sample_retention: Option<usize>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum StringOrNum {
    String(String),
    Num(u64),
}

/// The assumed output voltage of the power adapter, for estimating the power
/// draw while charging.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum AdapterVoltage {
    #[default]
    V5,
    V9,
    V10,
    V12,
    V15,
    V20,
}

impl FromStr for AdapterVoltage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches(['V', 'v']) {
            "5" => Ok(AdapterVoltage::V5),
            "9" => Ok(AdapterVoltage::V9),
            "10" => Ok(AdapterVoltage::V10),
            "12" => Ok(AdapterVoltage::V12),
            "15" => Ok(AdapterVoltage::V15),
            "20" => Ok(AdapterVoltage::V20),
            _ => Err(format!(
                "'{s}' is an invalid adapter voltage, use one of: [5V, 9V, 10V, 12V, 15V, 20V]."
            )),
        }
    }
}

impl AdapterVoltage {
    pub fn volts(&self) -> f64 {
        match self {
            AdapterVoltage::V5 => 5.0,
            AdapterVoltage::V9 => 9.0,
            AdapterVoltage::V10 => 10.0,
            AdapterVoltage::V12 => 12.0,
            AdapterVoltage::V15 => 15.0,
            AdapterVoltage::V20 => 20.0,
        }
    }
}

fn parse_ms_string(s: &str) -> error::Result<u64> {
    if let Ok(ms) = s.parse::<u64>() {
        Ok(ms)
    } else {
        humantime::parse_duration(s)
            .map(|duration| duration.as_millis() as u64)
            .map_err(|_| {
                BatwatchError::Config(format!(
                    "'{s}' is an invalid time value, use a number in milliseconds or a human \
                    duration like '1s'."
                ))
            })
    }
}

fn try_parse_ms(value: &StringOrNum) -> error::Result<u64> {
    match value {
        StringOrNum::String(s) => parse_ms_string(s),
        StringOrNum::Num(n) => Ok(*n),
    }
}

/// Where the config file lives: the explicit location if one was given,
/// otherwise the default spot in the user config directory.
pub fn read_config(config_location: Option<&str>) -> error::Result<Option<PathBuf>> {
    let config_path = if let Some(conf_loc) = config_location {
        Some(PathBuf::from(conf_loc))
    } else {
        dirs::config_dir().map(|config_dir| config_dir.join(DEFAULT_CONFIG_FILE_LOCATION))
    };

    Ok(config_path)
}

/// Parses the config file, or writes out a default one if it doesn't exist.
pub fn create_or_get_config(config_path: &Option<PathBuf>) -> error::Result<Config> {
    if let Some(path) = config_path {
        if let Ok(config_string) = fs::read_to_string(path) {
            // We found a config file!
            Ok(toml_edit::de::from_str(config_string.as_str())?)
        } else {
            // Config file DNE...
            if let Some(parent_path) = path.parent() {
                fs::create_dir_all(parent_path)?;
            }
            fs::File::create(path)?.write_all(DEFAULT_CONFIG_CONTENT.as_bytes())?;
            Ok(Config::default())
        }
    } else {
        // Don't write, the config path was somehow None...
        Ok(Config::default())
    }
}

/// Merges CLI arguments over config file flags into the final settings.
/// Arguments always win.
pub fn init_app_config(args: &BatwatchArgs, config: &Config) -> error::Result<AppConfigFields> {
    let flags = config.flags.clone().unwrap_or_default();

    let update_rate_in_milliseconds = match &args.general_args.rate {
        Some(rate) => parse_ms_string(rate)?,
        None => match &flags.rate {
            Some(rate) => try_parse_ms(rate)?,
            None => DEFAULT_UPDATE_RATE_IN_MILLISECONDS,
        },
    }
    .clamp_lower(MIN_UPDATE_RATE_IN_MILLISECONDS);

    let temperature_type = if args.temperature_args.fahrenheit {
        TemperatureType::Fahrenheit
    } else if args.temperature_args.celsius {
        TemperatureType::Celsius
    } else {
        match &flags.temperature_type {
            Some(s) => s.parse::<TemperatureType>().map_err(BatwatchError::Config)?,
            None => TemperatureType::default(),
        }
    };

    let adapter_voltage = match args
        .battery_args
        .adapter_voltage
        .as_deref()
        .or(flags.adapter_voltage.as_deref())
    {
        Some(s) => s.parse::<AdapterVoltage>().map_err(BatwatchError::Config)?,
        None => AdapterVoltage::default(),
    };

    let show_status = if args.general_args.hide_status {
        false
    } else {
        flags.notification.unwrap_or(true)
    };

    let history_enabled = args.history_args.history || flags.history.unwrap_or(false);

    let sample_interval_in_milliseconds = match &args.history_args.sample_interval {
        Some(interval) => parse_ms_string(interval)?,
        None => match &flags.sample_interval {
            Some(interval) => try_parse_ms(interval)?,
            None => DEFAULT_SAMPLE_INTERVAL_IN_MILLISECONDS,
        },
    };

    let sample_retention = args
        .history_args
        .sample_retention
        .or(flags.sample_retention);

    Ok(AppConfigFields {
        update_rate_in_milliseconds,
        temperature_type,
        adapter_voltage,
        show_status,
        history_enabled,
        sample_interval_in_milliseconds,
        sample_retention,
    })
}

/// Resolves where the history files live: the explicit directory if one was
/// given, otherwise a batwatch directory under the user's local data dir.
/// Returns `(charge_history_path, sample_log_path)`.
pub fn get_history_paths(
    args: &BatwatchArgs, config: &Config,
) -> error::Result<(PathBuf, PathBuf)> {
    let history_dir = args
        .history_args
        .history_dir
        .clone()
        .or_else(|| {
            config
                .flags
                .as_ref()
                .and_then(|flags| flags.history_dir.clone())
        })
        .map(PathBuf::from)
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join(DEFAULT_HISTORY_DIR_NAME)));

    let Some(history_dir) = history_dir else {
        return Err(BatwatchError::Config(
            "couldn't find a local data directory for history files; set 'history_dir'."
                .to_string(),
        ));
    };

    Ok((
        history_dir.join(CHARGE_HISTORY_FILE_NAME),
        history_dir.join(SAMPLE_LOG_FILE_NAME),
    ))
}
