/// Devices whose partitions carry a `p` separator (`nvme0n1p1`, `mmcblk0p2`).
fn uses_p_separator(disk: &str) -> bool {
    disk.contains("nvme") || disk.contains("mmcblk")
}

/// Partition path helper for block devices. Handles nvme/mmcblk postfixing.
pub fn partition_path(disk: &str, num: u32) -> String {
    if uses_p_separator(disk) {
        format!("{}p{}", disk, num)
    } else {
        format!("{}{}", disk, num)
    }
}

/// Split a partition path into `(disk, partition number)`, the inverse of [`partition_path`].
///
/// The whole trailing run of digits is the partition number, so the disk part
/// never ends in a digit unless a `p` separator sat between them. Returns
/// `None` when there is no trailing number or when an nvme/mmcblk path lacks
/// its `p` separator.
pub fn split_partition_path(partition: &str) -> Option<(&str, &str)> {
    let digits_at = partition
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    let (rest, number) = partition.split_at(digits_at);
    if rest.is_empty() {
        return None;
    }

    let disk = match rest.strip_suffix('p') {
        Some(stripped) if stripped.ends_with(|c: char| c.is_ascii_digit()) => stripped,
        _ if uses_p_separator(rest) => return None,
        _ => rest,
    };
    Some((disk, number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_path_appends_separator_for_nvme() {
        assert_eq!(partition_path("/dev/nvme0n1", 1), "/dev/nvme0n1p1");
        assert_eq!(partition_path("/dev/mmcblk0", 2), "/dev/mmcblk0p2");
        assert_eq!(partition_path("/dev/sda", 3), "/dev/sda3");
    }

    #[test]
    fn split_traditional_partition() {
        assert_eq!(split_partition_path("/dev/sda1"), Some(("/dev/sda", "1")));
        assert_eq!(split_partition_path("/dev/xvda15"), Some(("/dev/xvda", "15")));
    }

    #[test]
    fn split_strips_p_separator() {
        assert_eq!(
            split_partition_path("/dev/nvme0n1p1"),
            Some(("/dev/nvme0n1", "1"))
        );
        assert_eq!(
            split_partition_path("/dev/mmcblk0p12"),
            Some(("/dev/mmcblk0", "12"))
        );
    }

    #[test]
    fn split_rejects_whole_disks() {
        assert_eq!(split_partition_path("/dev/sda"), None);
        assert_eq!(split_partition_path("/dev/nvme0n1"), None);
        assert_eq!(split_partition_path("42"), None);
    }

    #[test]
    fn split_is_inverse_of_partition_path() {
        for disk in ["/dev/sda", "/dev/xvdf", "/dev/nvme1n1", "/dev/mmcblk0"] {
            let path = partition_path(disk, 3);
            assert_eq!(split_partition_path(&path), Some((disk, "3")));
        }
    }
}
