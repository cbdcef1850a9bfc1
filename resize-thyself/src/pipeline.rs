//! One full check-and-resize pass over the instance's root device.

use crate::config::Config;
use crate::device_map::resolve_kernel_device;
use crate::errors::{ResizeError, Result};
use crate::grow::{self, PartitionSpec};
use crate::mounts::resolve_mount;
use crate::orchestrator::{ResizeOrchestrator, ResizeOutcome};
use crate::shell::ShellExecutor;
use crate::usage::{needs_resize, usage_ratio};
use crate::volume::find_volume;
use resize_hal::ResizeHal;

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOutcome {
    NoResizeNeeded { device: String, usage: f64 },
    Resized(ResizeOutcome),
}

/// Check every device this instance is responsible for, one at a time.
pub fn run<H: ResizeHal>(hal: &H, config: &Config) -> Result<Vec<DeviceOutcome>> {
    let instance_id = hal.instance_id().map_err(ResizeError::Metadata)?;
    let root_device = hal.root_block_device().map_err(ResizeError::Metadata)?;
    log::debug!("Instance {} has root device {}", instance_id, root_device);

    // Only the root device today; each entry is handled to completion before the next.
    let devices = [root_device];
    let mut outcomes = Vec::with_capacity(devices.len());
    for device in &devices {
        outcomes.push(process_device(hal, config, &instance_id, device)?);
    }
    Ok(outcomes)
}

pub fn process_device<H: ResizeHal>(
    hal: &H,
    config: &Config,
    instance_id: &str,
    cloud_device: &str,
) -> Result<DeviceOutcome> {
    let shell = ShellExecutor::new(hal, config.dry_run);

    let kernel_device = resolve_kernel_device(hal, cloud_device)?;
    let mount = resolve_mount(hal, &kernel_device)?;
    let usage = usage_ratio(&shell, &mount.mount_point)?;

    if !needs_resize(usage, config.threshold) {
        log::info!(
            "{} is {:.1}% full (threshold {:.0}%); nothing to do",
            mount.mount_point.display(),
            usage * 100.0,
            config.threshold * 100.0
        );
        return Ok(DeviceOutcome::NoResizeNeeded {
            device: cloud_device.to_string(),
            usage,
        });
    }
    log::info!(
        "{} is {:.1}% full (threshold {:.0}%); resizing",
        mount.mount_point.display(),
        usage * 100.0,
        config.threshold * 100.0
    );

    // A whole-disk mount cannot be grown afterwards; fail before touching the cloud.
    let partition = PartitionSpec::parse(&mount.partition)?;
    let volume = find_volume(hal, instance_id, cloud_device)?;
    let outcome = ResizeOrchestrator::new(hal, config).run(&volume)?;
    grow::grow(&shell, &partition)?;

    Ok(DeviceOutcome::Resized(outcome))
}
