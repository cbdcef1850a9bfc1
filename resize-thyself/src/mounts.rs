//! Resolve a kernel device to the single partition mounted from it.

use crate::errors::{ResizeError, Result};
use resize_hal::procfs::mounts::entries_with_device_prefix;
use resize_hal::HostOps;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfo {
    pub partition: String,
    pub mount_point: PathBuf,
}

/// Pick the one mount table entry whose device starts with `device`.
pub fn mount_from_table(table: &str, device: &str) -> Result<MountInfo> {
    let mut matches = entries_with_device_prefix(table, device);
    if matches.len() != 1 {
        return Err(ResizeError::AmbiguousMount {
            device: device.to_string(),
            matches: matches
                .iter()
                .map(|m| format!("{} {}", m.device, m.mount_point.display()))
                .collect(),
        });
    }
    let entry = matches.remove(0);
    Ok(MountInfo {
        partition: entry.device,
        mount_point: entry.mount_point,
    })
}

pub fn resolve_mount(host: &dyn HostOps, device: &str) -> Result<MountInfo> {
    let table = host.proc_mounts().map_err(ResizeError::MountTable)?;
    let info = mount_from_table(&table, device)?;
    log::debug!(
        "{} is mounted from {} on {}",
        device,
        info.partition,
        info.mount_point.display()
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resize_hal::{FakeHal, HalError, HalResult};
    use std::path::Path;

    /// A host whose mount table cannot be read.
    struct UnreadableMounts;

    impl HostOps for UnreadableMounts {
        fn proc_mounts(&self) -> HalResult<String> {
            Err(HalError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )))
        }

        fn device_exists(&self, _path: &Path) -> bool {
            true
        }
    }

    const TABLE: &str = "\
proc /proc proc rw,nosuid 0 0
/dev/xvda1 / ext4 rw,relatime,discard 0 0
tmpfs /run tmpfs rw,nosuid 0 0
";

    #[test]
    fn single_match_yields_partition_and_mount_point() {
        let info = mount_from_table(TABLE, "/dev/xvda").unwrap();
        assert_eq!(info.partition, "/dev/xvda1");
        assert_eq!(info.mount_point, PathBuf::from("/"));
    }

    #[test]
    fn no_match_is_ambiguous() {
        let err = mount_from_table(TABLE, "/dev/nvme0n1").unwrap_err();
        assert!(matches!(err, ResizeError::AmbiguousMount { matches: ref found, .. } if found.is_empty()));
    }

    #[test]
    fn two_matches_are_ambiguous() {
        let table = format!("{TABLE}/dev/xvda2 /boot ext4 rw 0 0\n");
        let err = mount_from_table(&table, "/dev/xvda").unwrap_err();
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn unreadable_mount_table_keeps_io_source() {
        let err = resolve_mount(&UnreadableMounts, "/dev/xvda").unwrap_err();
        match &err {
            ResizeError::MountTable(HalError::Io(io)) => {
                assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Could not read the mount table"));
    }

    #[test]
    fn escaped_mount_points_are_decoded() {
        let hal = FakeHal::new().with_proc_mounts("/dev/sdb1 /mnt/my\\040data ext4 rw 0 0\n");
        let info = resolve_mount(&hal, "/dev/sdb").unwrap();
        assert_eq!(info.mount_point, PathBuf::from("/mnt/my data"));
    }
}
