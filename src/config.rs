//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::state::SettingsUpdate;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "break-alarm")]
#[command(about = "A break reminder daemon that alternates work and break phases")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work phase length in minutes (1-180), overrides saved settings
    #[arg(short, long)]
    pub work_minutes: Option<u32>,

    /// Break phase length in seconds (5-600), overrides saved settings
    #[arg(short, long)]
    pub break_seconds: Option<u32>,

    /// Pause at every phase change instead of rolling into the next phase
    #[arg(long)]
    pub no_auto_start: bool,

    /// Start counting down immediately
    #[arg(long)]
    pub start: bool,

    /// File used to persist settings between runs
    #[arg(long, default_value = "break-alarm.json")]
    pub settings_file: PathBuf,

    /// Neither load nor save the settings file
    #[arg(long)]
    pub no_persist: bool,

    /// Heartbeat interval in milliseconds
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u64).range(10..=5000))]
    pub pulse_ms: u64,

    /// Log notifications instead of showing desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Shell command launched for the duration of every break
    #[arg(long)]
    pub break_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn pulse_interval(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    /// Settings given on the command line, applied over saved settings
    pub fn settings_overrides(&self) -> SettingsUpdate {
        let mut update = SettingsUpdate::default();
        if let Some(minutes) = self.work_minutes {
            update = update.work_minutes(minutes);
        }
        if let Some(seconds) = self.break_seconds {
            update = update.break_seconds(seconds);
        }
        if self.no_auto_start {
            update = update.auto_start_next(false);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_bind_locally() {
        let config = Config::try_parse_from(["break-alarm"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.pulse_interval(), Duration::from_millis(200));
        assert_eq!(config.log_level(), "info");
        assert!(config.settings_overrides().is_empty());
    }

    #[test]
    fn duration_flags_become_overrides() {
        let config =
            Config::try_parse_from(["break-alarm", "-w", "45", "--break-seconds", "60", "--no-auto-start"]).unwrap();
        let update = config.settings_overrides();
        assert_eq!(update.work_minutes, Some(json!(45)));
        assert_eq!(update.break_seconds, Some(json!(60)));
        assert_eq!(update.auto_start_next, Some(json!(false)));
    }

    #[test]
    fn pulse_interval_is_bounded() {
        assert!(Config::try_parse_from(["break-alarm", "--pulse-ms", "1"]).is_err());
    }
}
