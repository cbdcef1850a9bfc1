//! Host information (read-only).
//!
//! This is "world-touching" (reads `/proc`, stats `/dev`) and belongs in the HAL.

use crate::HalResult;
use std::path::Path;

pub trait HostOps {
    /// Contents of the live mount table (`/proc/mounts`).
    fn proc_mounts(&self) -> HalResult<String>;

    /// True when `path` exists and is not a directory.
    fn device_exists(&self, path: &Path) -> bool;
}
