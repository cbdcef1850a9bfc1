//! Locate the cloud volume attached to this instance under a given device name.

use crate::errors::{ResizeError, Result};
use resize_hal::{CloudOps, Volume};

pub fn find_volume(cloud: &dyn CloudOps, instance_id: &str, device: &str) -> Result<Volume> {
    let volumes = cloud
        .describe_volumes(instance_id)
        .map_err(|e| ResizeError::cloud(format!("describe-volumes {}", instance_id), e))?;

    let mut matching: Vec<Volume> = volumes
        .into_iter()
        .filter(|v| v.is_attached_as(device))
        .collect();

    if matching.is_empty() {
        return Err(ResizeError::NoAttachedVolume {
            instance_id: instance_id.to_string(),
            device: device.to_string(),
        });
    }
    if matching.len() > 1 {
        let ids: Vec<&str> = matching.iter().map(|v| v.volume_id.as_str()).collect();
        log::warn!(
            "{} volumes attached as {}: {}; using {}",
            matching.len(),
            device,
            ids.join(", "),
            ids[0]
        );
    }

    let volume = matching.remove(0);
    log::info!(
        "{} is volume {} ({} GiB)",
        device,
        volume.volume_id,
        volume.size
    );
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resize_hal::{FakeHal, Operation, VolumeAttachment};

    fn volume(id: &str, size: u64, device: &str) -> Volume {
        Volume {
            volume_id: id.to_string(),
            size,
            attachments: vec![VolumeAttachment {
                device: device.to_string(),
                instance_id: Some("i-123".to_string()),
                state: Some("attached".to_string()),
            }],
        }
    }

    #[test]
    fn picks_the_volume_attached_as_device() {
        let hal = FakeHal::new()
            .with_volume(volume("vol-data", 500, "/dev/sdf"))
            .with_volume(volume("vol-root", 8, "/dev/xvda"));
        let found = find_volume(&hal, "i-123", "/dev/xvda").unwrap();
        assert_eq!(found.volume_id, "vol-root");
        assert_eq!(found.size, 8);
        assert!(hal.has_operation(
            |op| matches!(op, Operation::DescribeVolumes { instance_id } if instance_id == "i-123")
        ));
    }

    #[test]
    fn first_of_several_matches_wins() {
        let hal = FakeHal::new()
            .with_volume(volume("vol-a", 8, "/dev/xvda"))
            .with_volume(volume("vol-b", 16, "/dev/xvda"));
        assert_eq!(find_volume(&hal, "i-123", "/dev/xvda").unwrap().volume_id, "vol-a");
    }

    #[test]
    fn no_match_is_an_error() {
        let hal = FakeHal::new().with_volume(volume("vol-data", 500, "/dev/sdf"));
        let err = find_volume(&hal, "i-123", "/dev/xvda").unwrap_err();
        assert!(matches!(err, ResizeError::NoAttachedVolume { .. }));
    }
}
