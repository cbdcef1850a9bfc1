use resize_hal::{HalError, ModificationState};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resize operations
pub type Result<T> = std::result::Result<T, ResizeError>;

/// Every variant is fatal for the current run.
#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("It looks like {cloud_device} doesn't exist on the system (tried {})", .candidates.join(", "))]
    DeviceNotFound {
        cloud_device: String,
        candidates: Vec<String>,
    },

    #[error("Expected exactly one mount for {device}, found {}: {}", .matches.len(), .matches.join("; "))]
    AmbiguousMount {
        device: String,
        matches: Vec<String>,
    },

    #[error("No volume is attached to {instance_id} as {device}")]
    NoAttachedVolume { instance_id: String, device: String },

    #[error("Cloud API call failed ({operation}): {source}")]
    CloudApi {
        operation: String,
        #[source]
        source: HalError,
    },

    #[error("{0}")]
    Subprocess(#[source] HalError),

    #[error("Could not parse df output for {}: {reason}", .mount_point.display())]
    UsageParse { mount_point: PathBuf, reason: String },

    #[error("{0} doesn't look like a partition path (expected <device><number>)")]
    PartitionParse(String),

    #[error("Could not read the mount table: {0}")]
    MountTable(#[source] HalError),

    #[error("Instance metadata unavailable: {0}")]
    Metadata(#[source] HalError),

    #[error("Volume {volume_id} still {state} after {attempts} status checks")]
    ResizeTimeout {
        volume_id: String,
        state: ModificationState,
        attempts: u32,
    },
}

impl ResizeError {
    pub fn cloud(operation: impl Into<String>, source: HalError) -> Self {
        ResizeError::CloudApi {
            operation: operation.into(),
            source,
        }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResizeError::Configuration(_) => 2,
            _ => 1,
        }
    }
}
