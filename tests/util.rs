use std::process::Command;

const BATW_EXE_PATH: &str = env!("CARGO_BIN_EXE_batw");

/// Returns the [`Command`] of a binary invocation of batwatch.
pub fn batw_command() -> Command {
    let mut cmd = Command::new(BATW_EXE_PATH);
    cmd.env("NO_COLOR", "1");
    cmd
}
