//! Partition and filesystem growth after the volume itself has grown.

use crate::errors::{ResizeError, Result};
use crate::shell::{Outcome, ShellExecutor};
use resize_hal::path::{partition_path, split_partition_path};
use std::time::Duration;

const GROW_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSpec {
    pub device: String,
    pub number: u32,
}

impl PartitionSpec {
    /// `/dev/xvda1` -> (`/dev/xvda`, 1); `/dev/nvme0n1p1` -> (`/dev/nvme0n1`, 1).
    pub fn parse(partition: &str) -> Result<Self> {
        let bad = || ResizeError::PartitionParse(partition.to_string());
        let (device, number) = split_partition_path(partition).ok_or_else(bad)?;
        let number: u32 = number.parse().map_err(|_| bad())?;
        // Rejects things like `/dev/sda01` that would not round-trip.
        if partition_path(device, number) != partition {
            return Err(bad());
        }
        Ok(Self {
            device: device.to_string(),
            number,
        })
    }

    /// The partition device path, e.g. `/dev/nvme0n1p1`.
    pub fn path(&self) -> String {
        partition_path(&self.device, self.number)
    }
}

/// `growpart` exits 1 and prints NOCHANGE when the partition already fills the disk.
fn growpart_nochange(code: Option<i32>, stdout: &str) -> bool {
    code == Some(1) && stdout.contains("NOCHANGE")
}

pub fn grow_partition(shell: &ShellExecutor<'_>, spec: &PartitionSpec) -> Result<Outcome> {
    let number = spec.number.to_string();
    shell.run_accepting(
        "growpart",
        &[spec.device.as_str(), number.as_str()],
        GROW_TIMEOUT,
        growpart_nochange,
    )
}

pub fn resize_filesystem(shell: &ShellExecutor<'_>, partition: &str) -> Result<Outcome> {
    shell.run("resize2fs", &[partition], GROW_TIMEOUT)
}

/// Grow the partition and then the filesystem on it.
pub fn grow(shell: &ShellExecutor<'_>, spec: &PartitionSpec) -> Result<()> {
    grow_partition(shell, spec)?;
    resize_filesystem(shell, &spec.path())?;
    Ok(())
}
