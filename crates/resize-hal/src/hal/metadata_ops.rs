//! Instance metadata (read-only).

use crate::HalResult;

/// Identity of the running instance as reported by the metadata service.
pub trait MetadataOps {
    /// Region the instance runs in, e.g. `us-east-1`.
    fn region(&self) -> HalResult<String>;

    /// Instance identifier, e.g. `i-0123456789abcdef0`.
    fn instance_id(&self) -> HalResult<String>;

    /// Device name the root volume is attached as, e.g. `/dev/xvda`.
    fn root_block_device(&self) -> HalResult<String>;
}
