//! Production HAL: the local Linux host plus the EC2 metadata service and volume API.

use super::{
    AwsCli, CloudOps, HostOps, ImdsClient, LinuxHal, MetadataOps, ProcessOps, ResizeRequest,
    Volume, VolumeModification,
};
use crate::HalResult;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Ec2Hal {
    linux: LinuxHal,
    imds: ImdsClient,
    cloud: AwsCli<LinuxHal>,
}

impl Ec2Hal {
    /// Build the HAL for the running instance. The region comes from instance
    /// metadata unless `region_override` is given.
    pub fn connect(imds: ImdsClient, region_override: Option<String>) -> HalResult<Self> {
        let region = match region_override {
            Some(region) => region,
            None => imds.region()?,
        };
        log::debug!("Using region {}", region);
        let linux = LinuxHal::new();
        Ok(Self {
            cloud: AwsCli::new(linux.clone(), region),
            linux,
            imds,
        })
    }

    pub fn region(&self) -> &str {
        self.cloud.region()
    }
}

impl ProcessOps for Ec2Hal {
    fn command_output(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> HalResult<Output> {
        self.linux.command_output(program, args, timeout)
    }
}

impl HostOps for Ec2Hal {
    fn proc_mounts(&self) -> HalResult<String> {
        self.linux.proc_mounts()
    }

    fn device_exists(&self, path: &Path) -> bool {
        self.linux.device_exists(path)
    }
}

impl MetadataOps for Ec2Hal {
    fn region(&self) -> HalResult<String> {
        Ok(self.cloud.region().to_string())
    }

    fn instance_id(&self) -> HalResult<String> {
        self.imds.instance_id()
    }

    fn root_block_device(&self) -> HalResult<String> {
        self.imds.root_block_device()
    }
}

impl CloudOps for Ec2Hal {
    fn describe_volumes(&self, instance_id: &str) -> HalResult<Vec<Volume>> {
        self.cloud.describe_volumes(instance_id)
    }

    fn modify_volume(&self, request: &ResizeRequest) -> HalResult<VolumeModification> {
        self.cloud.modify_volume(request)
    }

    fn latest_modification(&self, volume_id: &str) -> HalResult<VolumeModification> {
        self.cloud.latest_modification(volume_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_override_skips_metadata() {
        // Nothing listens on this endpoint; an override must not touch it.
        let imds = ImdsClient::new("http://127.0.0.1:9");
        let hal = Ec2Hal::connect(imds, Some("ap-southeast-2".to_string())).unwrap();
        assert_eq!(hal.region(), "ap-southeast-2");
        assert_eq!(MetadataOps::region(&hal).unwrap(), "ap-southeast-2");
    }
}
