//! Shared defaults and the default config file template.

use indoc::indoc;

/// How often battery data is refreshed by default, in milliseconds.
pub const DEFAULT_UPDATE_RATE_IN_MILLISECONDS: u64 = 1000;

/// The lowest refresh rate we allow, in milliseconds.
pub const MIN_UPDATE_RATE_IN_MILLISECONDS: u64 = 100;

/// How long the main loop waits on the event channel before looping again.
pub const TICK_RATE_IN_MILLISECONDS: u64 = 250;

/// How often the charge session accumulators are fed while charging.
pub const SESSION_SAMPLE_RATE_IN_MILLISECONDS: u64 = 1000;

/// How often a current sample is appended to the sample log by default.
pub const DEFAULT_SAMPLE_INTERVAL_IN_MILLISECONDS: u64 = 1000 * 60 * 60 * 24;

/// Default config file path relative to the user config directory.
pub const DEFAULT_CONFIG_FILE_LOCATION: &str = "batwatch/batwatch.toml";

/// Directory name under the user's local data directory used for history files.
pub const DEFAULT_HISTORY_DIR_NAME: &str = "batwatch";

/// File name of the counted charge record store.
pub const CHARGE_HISTORY_FILE_NAME: &str = "charge_history.json";

/// File name of the line-oriented current sample log.
pub const SAMPLE_LOG_FILE_NAME: &str = "battery_history.txt";

/// Some drivers leave `current_now` at zero on the detected supply; this fixed
/// path is the fallback, always read as microamps.
pub const FALLBACK_CURRENT_NOW_PATH: &str = "/sys/class/power_supply/battery/current_now";

/// The default config file contents, written out on first run.
pub const DEFAULT_CONFIG_CONTENT: &str = indoc! {r##"
    # This is a default config file for batwatch. All of the settings are commented
    # out; remove the leading '#' to change a setting.

    [flags]
    # How often battery data is refreshed. Takes a number in milliseconds or a
    # human duration (e.g. 1s). The minimum is 100ms.
    #rate = 1000

    # The temperature unit. One of ["celsius", "c", "fahrenheit", "f"].
    #temperature_type = "celsius"

    # The assumed output voltage of the power adapter, used to estimate power
    # draw while charging. One of ["5V", "9V", "10V", "12V", "15V", "20V"].
    #adapter_voltage = "5V"

    # Whether a status line is printed on every refresh.
    #notification = true

    # Whether charge records and current samples are written to disk.
    #history = false

    # The directory used for history files. Defaults to the platform's local
    # data directory.
    #history_dir = "/path/to/dir"

    # How often a current sample is appended to the sample log. Takes a number
    # in milliseconds or a human duration (e.g. 1h).
    #sample_interval = "24h"

    # Maximum number of samples kept in the sample log. Unlimited if unset.
    #sample_retention = 10000
"##};
