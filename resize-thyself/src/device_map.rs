//! Mapping of cloud-reported block device names to the kernel's names.
//!
//! The cloud calls the root disk `/dev/sda1` or `/dev/xvda`; depending on the
//! instance type and driver the kernel exposes it as an NVMe namespace, a Xen
//! virtual disk or the literal name. Candidates are probed in order and the
//! first that exists wins.

use crate::errors::{ResizeError, Result};
use resize_hal::HostOps;
use std::path::Path;

struct NamingRule {
    cloud_name: &'static str,
    candidates: &'static [&'static str],
}

static NAMING_RULES: &[NamingRule] = &[
    NamingRule {
        cloud_name: "/dev/sda1",
        candidates: &["/dev/nvme0n1p1", "/dev/xvda1", "/dev/sda1"],
    },
    NamingRule {
        cloud_name: "/dev/xvda",
        candidates: &["/dev/nvme0n1p1", "/dev/xvda"],
    },
];

/// Kernel paths to probe for `cloud_name`, highest priority first.
pub fn candidates_for(cloud_name: &str) -> Vec<String> {
    match NAMING_RULES.iter().find(|r| r.cloud_name == cloud_name) {
        Some(rule) => rule.candidates.iter().map(|c| c.to_string()).collect(),
        None => vec![cloud_name.to_string()],
    }
}

pub fn resolve_kernel_device(host: &dyn HostOps, cloud_name: &str) -> Result<String> {
    let candidates = candidates_for(cloud_name);
    for candidate in &candidates {
        if host.device_exists(Path::new(candidate)) {
            if candidate != cloud_name {
                log::debug!("{} is known to the kernel as {}", cloud_name, candidate);
            }
            return Ok(candidate.clone());
        }
        log::debug!("{} not present", candidate);
    }
    Err(ResizeError::DeviceNotFound {
        cloud_device: cloud_name.to_string(),
        candidates,
    })
}
