//! Parsing helpers for `/proc/mounts` (fstab-style mount table).

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: PathBuf,
    pub fstype: Option<String>,
}

/// Parse a single mount table line: `<device> <mount point> <fstype> <options> ...`.
pub fn parse_mount_line(line: &str) -> Option<MountEntry> {
    let mut fields = line.split_whitespace();
    let device = fields.next()?;
    let mount_point = fields.next()?;
    let fstype = fields.next().map(str::to_string);
    Some(MountEntry {
        device: device.to_string(),
        mount_point: PathBuf::from(unescape_mount_path(mount_point)),
        fstype,
    })
}

pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    content.lines().filter_map(parse_mount_line).collect()
}

/// Entries whose device field starts with `prefix` (the `grep ^<device>` query).
///
/// A base device therefore matches its partitions as well as itself.
pub fn entries_with_device_prefix(content: &str, prefix: &str) -> Vec<MountEntry> {
    parse_mounts(content)
        .into_iter()
        .filter(|entry| entry.device.starts_with(prefix))
        .collect()
}

pub fn unescape_mount_path(raw: &str) -> String {
    raw.replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0\n\
                          /dev/xvda1 / ext4 rw,relatime,discard 0 0\n\
                          /dev/xvdf /mnt/data\\040disk xfs rw,relatime 0 0\n\
                          tmpfs /run tmpfs rw,nosuid,nodev 0 0\n";

    #[test]
    fn parse_mounts_extracts_device_and_mountpoint() {
        let entries = parse_mounts(SAMPLE);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1].device, "/dev/xvda1");
        assert_eq!(entries[1].mount_point, PathBuf::from("/"));
        assert_eq!(entries[1].fstype.as_deref(), Some("ext4"));
    }

    #[test]
    fn mount_points_are_unescaped() {
        let entries = parse_mounts(SAMPLE);
        assert_eq!(entries[2].mount_point, PathBuf::from("/mnt/data disk"));
    }

    #[test]
    fn prefix_match_finds_partitions_of_base_device() {
        let matches = entries_with_device_prefix(SAMPLE, "/dev/xvda");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].device, "/dev/xvda1");
    }

    #[test]
    fn prefix_match_ignores_other_devices() {
        assert!(entries_with_device_prefix(SAMPLE, "/dev/nvme0n1").is_empty());
    }

    #[test]
    fn short_lines_are_skipped() {
        assert!(parse_mounts("lonely\n\n").is_empty());
    }
}
