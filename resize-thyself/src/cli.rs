//! CLI argument parsing for resize-thyself

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resize-thyself")]
#[command(version, about = "Automatically resize a block device under pressure")]
#[command(long_about = "Automatically resize a block device under pressure.\n\n\
    When the root filesystem is fuller than --threshold, the backing cloud volume is grown \
    by --grow-percent, then the partition and filesystem are grown to match.")]
pub struct Cli {
    /// How full should the disk be before acting? (percent)
    #[arg(long, value_name = "PERCENT", default_value_t = crate::config::DEFAULT_THRESHOLD_PERCENT)]
    pub threshold: u32,

    /// How much to grow the volume by (percent of its current size)
    #[arg(long, value_name = "PERCENT", default_value_t = crate::config::DEFAULT_GROW_PERCENT)]
    pub grow_percent: u32,

    /// Be more verbose
    #[arg(short, long)]
    pub verbose: bool,

    /// Dry run (don't resize)
    #[arg(short = 'd', long = "dryrun")]
    pub dry_run: bool,

    /// Seconds between volume modification status checks
    #[arg(long = "poll-interval", value_name = "SECS", default_value_t = crate::config::DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Give up after this many status checks (default: wait forever)
    #[arg(long, value_name = "N")]
    pub max_poll_attempts: Option<u32>,

    /// Cloud region (default: from instance metadata)
    #[arg(long)]
    pub region: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["resize-thyself"]).unwrap();
        assert_eq!(cli.threshold, 90);
        assert_eq!(cli.grow_percent, 10);
        assert_eq!(cli.poll_interval_secs, 60);
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
        assert!(cli.max_poll_attempts.is_none());
    }

    #[test]
    fn parses_flags_in_equals_form() {
        let cli = Cli::try_parse_from([
            "resize-thyself",
            "--threshold=80",
            "--grow-percent=20",
            "-v",
            "-d",
            "--max-poll-attempts=5",
        ])
        .unwrap();
        assert_eq!(cli.threshold, 80);
        assert_eq!(cli.grow_percent, 20);
        assert!(cli.verbose);
        assert!(cli.dry_run);
        assert_eq!(cli.max_poll_attempts, Some(5));
    }

    #[test]
    fn long_dryrun_spelling() {
        let cli = Cli::try_parse_from(["resize-thyself", "--dryrun"]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn rejects_non_numeric_threshold() {
        assert!(Cli::try_parse_from(["resize-thyself", "--threshold=lots"]).is_err());
    }
}
