//! Run configuration, validated once at startup and read-only afterwards.

use crate::cli::Cli;
use crate::errors::{ResizeError, Result};
use std::time::Duration;

pub const DEFAULT_THRESHOLD_PERCENT: u32 = 90;
pub const DEFAULT_GROW_PERCENT: u32 = 10;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Usage fraction above which a resize is triggered, in (0, 1).
    pub threshold: f64,
    /// Growth applied to the current volume size, in whole percent.
    pub grow_percent: u32,
    pub dry_run: bool,
    pub poll_interval: Duration,
    /// `None` waits for the cloud indefinitely.
    pub max_poll_attempts: Option<u32>,
    pub region: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: f64::from(DEFAULT_THRESHOLD_PERCENT) / 100.0,
            grow_percent: DEFAULT_GROW_PERCENT,
            dry_run: false,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_poll_attempts: None,
            region: None,
        }
    }
}

impl Config {
    /// Build a config from whole-number percentages as given on the command line.
    pub fn from_percentages(threshold_percent: u32, grow_percent: u32) -> Result<Self> {
        if !(1..=99).contains(&threshold_percent) {
            return Err(ResizeError::Configuration(format!(
                "--threshold must be between 1 and 99, got {}",
                threshold_percent
            )));
        }
        if !(1..=100).contains(&grow_percent) {
            return Err(ResizeError::Configuration(format!(
                "--grow-percent must be between 1 and 100, got {}",
                grow_percent
            )));
        }
        Ok(Self {
            threshold: f64::from(threshold_percent) / 100.0,
            grow_percent,
            ..Self::default()
        })
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_poll_attempts(mut self, attempts: Option<u32>) -> Self {
        self.max_poll_attempts = attempts;
        self
    }
}

impl TryFrom<&Cli> for Config {
    type Error = ResizeError;

    fn try_from(cli: &Cli) -> Result<Self> {
        if cli.max_poll_attempts == Some(0) {
            return Err(ResizeError::Configuration(
                "--max-poll-attempts must be at least 1".to_string(),
            ));
        }
        let region = match cli.region.as_deref().map(str::trim) {
            Some("") => {
                return Err(ResizeError::Configuration(
                    "--region must not be empty".to_string(),
                ))
            }
            other => other.map(str::to_string),
        };

        let mut config = Config::from_percentages(cli.threshold, cli.grow_percent)?
            .with_dry_run(cli.dry_run)
            .with_poll_interval(Duration::from_secs(cli.poll_interval_secs))
            .with_max_poll_attempts(cli.max_poll_attempts);
        config.region = region;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Config> {
        let mut argv = vec!["resize-thyself"];
        argv.extend_from_slice(args);
        Config::try_from(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn threshold_becomes_fraction_growth_stays_whole() {
        let config = parse(&["--threshold=85", "--grow-percent=20"]).unwrap();
        assert!((config.threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.grow_percent, 20);
    }

    #[test]
    fn defaults_are_ninety_and_ten_percent() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert!((config.threshold - 0.90).abs() < f64::EPSILON);
        assert_eq!(config.grow_percent, 10);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
    }

    #[test]
    fn out_of_range_threshold_is_configuration_error() {
        for bad in ["--threshold=0", "--threshold=100"] {
            let err = parse(&[bad]).unwrap_err();
            assert!(matches!(err, ResizeError::Configuration(_)), "{bad}");
        }
    }

    #[test]
    fn zero_growth_is_rejected() {
        let err = parse(&["--grow-percent=0"]).unwrap_err();
        assert!(err.to_string().contains("--grow-percent"));
    }

    #[test]
    fn zero_poll_attempts_is_rejected() {
        assert!(parse(&["--max-poll-attempts=0"]).is_err());
    }

    #[test]
    fn blank_region_is_rejected() {
        assert!(parse(&["--region", " "]).is_err());
        let config = parse(&["--region", "us-west-2", "-d"]).unwrap();
        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        assert!(config.dry_run);
    }
}
