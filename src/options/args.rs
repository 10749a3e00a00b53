// Argument parsing via clap.
//
// Note that you probably want to keep this as a single file so the build script doesn't
// trip all over itself.

use clap::*;
use indoc::indoc;

const TEMPLATE: &str = indoc! {
    "{name} {version}

    {about}

    {usage-heading} {usage}

    {all-args}"
};

const USAGE: &str = "batw [OPTIONS]";

/// The arguments for batwatch.
#[derive(Parser, Debug)]
#[command(
    name = crate_name!(),
    version = crate_version!(),
    about = crate_description!(),
    disable_help_flag = true,
    disable_version_flag = true,
    color = ColorChoice::Auto,
    help_template = TEMPLATE,
    override_usage = USAGE,
)]
pub struct BatwatchArgs {
    #[command(flatten)]
    pub general_args: GeneralArgs,

    #[command(flatten)]
    pub temperature_args: TemperatureArgs,

    #[command(flatten)]
    pub battery_args: BatteryArgs,

    #[command(flatten)]
    pub history_args: HistoryArgs,

    #[command(flatten)]
    pub other_args: OtherArgs,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "General Options")]
pub struct GeneralArgs {
    #[arg(
        short = 'C',
        long = "config_location",
        value_name = "PATH",
        help = "Sets the location of the config file.",
        long_help = "Sets the location of the config file. Expects a config file in the TOML format. \
                    If it doesn't exist, a default config file is created at the path."
    )]
    pub config_location: Option<String>,

    #[arg(
        short = 'r',
        long,
        value_name = "TIME",
        help = "Sets how often battery data is refreshed.",
        long_help = "Sets how often battery data is refreshed. Takes a number in milliseconds or a \
                    human duration (e.g. 1s). The minimum is 100ms, and the default is 1000ms."
    )]
    pub rate: Option<String>,

    #[arg(
        long = "hide_status",
        help = "Hides the per-refresh status line.",
        long_help = "Hides the status line that is normally printed on every refresh. Charge \
                    sessions and history are unaffected."
    )]
    pub hide_status: bool,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "Temperature Options")]
pub struct TemperatureArgs {
    #[arg(
        short = 'c',
        long,
        group = "temperature_unit",
        help = "Use Celsius as the temperature unit. Default.",
        long_help = "Use Celsius as the temperature unit. This is the default option."
    )]
    pub celsius: bool,

    #[arg(
        short = 'f',
        long,
        group = "temperature_unit",
        help = "Use Fahrenheit as the temperature unit."
    )]
    pub fahrenheit: bool,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "Battery Options")]
pub struct BatteryArgs {
    #[arg(
        long = "adapter_voltage",
        value_name = "VOLTAGE",
        help = "Sets the assumed output voltage of the power adapter.",
        long_help = "Sets the assumed output voltage of the power adapter, used to estimate power \
                    draw while charging. One of [5V, 9V, 10V, 12V, 15V, 20V]. Defaults to 5V."
    )]
    pub adapter_voltage: Option<String>,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "History Options")]
pub struct HistoryArgs {
    #[arg(
        long,
        help = "Enables the on-disk charge history.",
        long_help = "Enables the on-disk charge history. A finalized charge record is appended when \
                    the power adapter is disconnected, and a current sample is appended to the \
                    sample log on a fixed cadence."
    )]
    pub history: bool,

    #[arg(
        long = "history_dir",
        value_name = "PATH",
        help = "Sets the directory used for history files.",
        long_help = "Sets the directory used for history files. Defaults to the platform's local \
                    data directory."
    )]
    pub history_dir: Option<String>,

    #[arg(
        long = "sample_interval",
        value_name = "TIME",
        help = "How often a current sample is appended to the sample log.",
        long_help = "How often a current sample is appended to the sample log. Takes a number in \
                    milliseconds or a human duration (e.g. 1h). Defaults to 24h."
    )]
    pub sample_interval: Option<String>,

    #[arg(
        long = "sample_retention",
        value_name = "N",
        help = "Maximum number of samples kept in the sample log.",
        long_help = "Maximum number of samples kept in the sample log. Once the log grows past this \
                    many lines, the oldest lines are dropped on the next write. Unlimited if unset."
    )]
    pub sample_retention: Option<usize>,
}

#[derive(Args, Clone, Debug, Default)]
#[command(next_help_heading = "Other Options")]
pub struct OtherArgs {
    #[arg(short = 'h', long, action = ArgAction::Help, help = "Prints help info (for more details use `--help`).")]
    help: Option<bool>,

    #[arg(short = 'v', long, action = ArgAction::Version, help = "Prints version information.")]
    version: Option<bool>,
}
