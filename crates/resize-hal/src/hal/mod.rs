//! HAL trait definitions and implementations.
//!
//! This module defines the core traits for host and cloud operations and
//! provides both real (LinuxHal, ImdsClient, AwsCli, Ec2Hal) and fake (FakeHal)
//! implementations.

pub mod aws_cli;
pub mod cloud_ops;
pub mod ec2_host;
pub mod fake_hal;
pub mod host_ops;
pub mod imds;
pub mod linux_hal;
pub mod metadata_ops;
pub mod process_ops;

pub use aws_cli::AwsCli;
pub use cloud_ops::{
    CloudOps, ModificationState, ResizeRequest, Volume, VolumeAttachment, VolumeModification,
};
pub use ec2_host::Ec2Hal;
pub use fake_hal::{FakeHal, Operation};
pub use host_ops::HostOps;
pub use imds::ImdsClient;
pub use linux_hal::LinuxHal;
pub use metadata_ops::MetadataOps;
pub use process_ops::ProcessOps;

/// Everything the resize workflow needs from the host and the cloud.
pub trait ResizeHal: ProcessOps + HostOps + MetadataOps + CloudOps {}

/// Automatically implement ResizeHal for any type implementing all required traits.
impl<T> ResizeHal for T where T: ProcessOps + HostOps + MetadataOps + CloudOps {}
