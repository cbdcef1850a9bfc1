//! Disk usage measurement via `df`.

use crate::errors::{ResizeError, Result};
use crate::shell::ShellExecutor;
use std::path::Path;
use std::time::Duration;

const DF_TIMEOUT: Duration = Duration::from_secs(30);

/// Used fraction from `df` output: second line, fields 2 (total) and 3 (used).
pub fn parse_df_output(output: &str) -> std::result::Result<f64, String> {
    let line = output
        .lines()
        .nth(1)
        .ok_or_else(|| "no data line".to_string())?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(format!("expected at least 3 fields in '{}'", line));
    }
    let total: f64 = fields[1]
        .parse()
        .map_err(|_| format!("total '{}' is not a number", fields[1]))?;
    let used: f64 = fields[2]
        .parse()
        .map_err(|_| format!("used '{}' is not a number", fields[2]))?;
    if total <= 0.0 {
        return Err("total size is zero".to_string());
    }
    Ok(used / total)
}

pub fn usage_ratio(shell: &ShellExecutor<'_>, mount_point: &Path) -> Result<f64> {
    let mount_arg = mount_point.to_string_lossy();
    let output = shell.query("df", &[&*mount_arg], DF_TIMEOUT)?;
    parse_df_output(&output).map_err(|reason| ResizeError::UsageParse {
        mount_point: mount_point.to_path_buf(),
        reason,
    })
}

/// Strictly above: a disk exactly at the threshold is left alone.
pub fn needs_resize(ratio: f64, threshold: f64) -> bool {
    ratio > threshold
}
