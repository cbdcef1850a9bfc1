//! Cloud volume inventory and modification trait.

use crate::HalResult;
use serde::Deserialize;
use std::fmt;

/// A block storage volume as listed by the cloud inventory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    pub volume_id: String,
    /// Declared size in GiB.
    pub size: u64,
    #[serde(default)]
    pub attachments: Vec<VolumeAttachment>,
}

impl Volume {
    pub fn is_attached_as(&self, device: &str) -> bool {
        self.attachments.iter().any(|a| a.device == device)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeAttachment {
    pub device: String,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// Cloud-side state of an asynchronous volume modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationState {
    Modifying,
    Optimizing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl ModificationState {
    pub fn is_completed(self) -> bool {
        self == ModificationState::Completed
    }
}

impl fmt::Display for ModificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModificationState::Modifying => "modifying",
            ModificationState::Optimizing => "optimizing",
            ModificationState::Completed => "completed",
            ModificationState::Failed => "failed",
            ModificationState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Modification record for a single volume.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeModification {
    pub volume_id: String,
    pub modification_state: ModificationState,
    #[serde(default)]
    pub target_size: Option<u64>,
    #[serde(default)]
    pub original_size: Option<u64>,
    #[serde(default)]
    pub progress: Option<u64>,
}

impl VolumeModification {
    pub fn is_completed(&self) -> bool {
        self.modification_state.is_completed()
    }
}

/// A request to grow a volume to `new_size` GiB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    pub volume_id: String,
    pub new_size: u64,
    /// Ask the cloud to validate the request without applying it.
    pub dry_run: bool,
}

pub trait CloudOps {
    /// All volumes attached to `instance_id`.
    fn describe_volumes(&self, instance_id: &str) -> HalResult<Vec<Volume>>;

    /// Submit a size modification. A dry-run request never mutates the volume.
    fn modify_volume(&self, request: &ResizeRequest) -> HalResult<VolumeModification>;

    /// Most recent modification record for `volume_id`.
    fn latest_modification(&self, volume_id: &str) -> HalResult<VolumeModification>;
}
