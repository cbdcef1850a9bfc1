//! Cloud volume API backed by the `aws` command line client.
//!
//! Calls go through [`ProcessOps`] so the JSON handling can be tested without
//! credentials or network access.

use super::{CloudOps, ProcessOps, ResizeRequest, Volume, VolumeModification};
use crate::{HalError, HalResult};
use serde::Deserialize;
use std::time::Duration;

const AWS: &str = "aws";
pub const DEFAULT_CLI_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVolumesOutput {
    #[serde(default)]
    volumes: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ModifyVolumeOutput {
    volume_modification: VolumeModification,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVolumesModificationsOutput {
    #[serde(default)]
    volumes_modifications: Vec<VolumeModification>,
}

#[derive(Debug, Clone)]
pub struct AwsCli<P> {
    process: P,
    region: String,
    timeout: Duration,
}

impl<P: ProcessOps> AwsCli<P> {
    pub fn new(process: P, region: impl Into<String>) -> Self {
        Self {
            process,
            region: region.into(),
            timeout: DEFAULT_CLI_TIMEOUT,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn ec2(&self, subcommand: &str, extra: &[&str]) -> HalResult<String> {
        let mut args = vec!["ec2", subcommand, "--region", self.region.as_str()];
        args.extend_from_slice(extra);
        args.extend_from_slice(&["--output", "json"]);
        self.process.command_stdout(AWS, &args, self.timeout)
    }
}

pub(crate) fn parse_volumes(json: &str) -> HalResult<Vec<Volume>> {
    let out: DescribeVolumesOutput = serde_json::from_str(json)?;
    Ok(out.volumes)
}

pub(crate) fn parse_modify_volume(json: &str) -> HalResult<VolumeModification> {
    let out: ModifyVolumeOutput = serde_json::from_str(json)?;
    Ok(out.volume_modification)
}

pub(crate) fn parse_latest_modification(
    volume_id: &str,
    json: &str,
) -> HalResult<VolumeModification> {
    let out: DescribeVolumesModificationsOutput = serde_json::from_str(json)?;
    out.volumes_modifications
        .into_iter()
        .last()
        .ok_or_else(|| HalError::Other(format!("no volume modifications found for {}", volume_id)))
}

impl<P: ProcessOps> CloudOps for AwsCli<P> {
    fn describe_volumes(&self, instance_id: &str) -> HalResult<Vec<Volume>> {
        let filter = format!("Name=attachment.instance-id,Values={}", instance_id);
        let json = self.ec2("describe-volumes", &["--filters", filter.as_str()])?;
        parse_volumes(&json)
    }

    fn modify_volume(&self, request: &ResizeRequest) -> HalResult<VolumeModification> {
        let size = request.new_size.to_string();
        let mut extra = vec!["--volume-id", request.volume_id.as_str(), "--size", size.as_str()];
        if request.dry_run {
            extra.push("--dry-run");
        }
        let json = self.ec2("modify-volume", &extra)?;
        parse_modify_volume(&json)
    }

    fn latest_modification(&self, volume_id: &str) -> HalResult<VolumeModification> {
        let json = self.ec2("describe-volumes-modifications", &["--volume-ids", volume_id])?;
        parse_latest_modification(volume_id, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::ModificationState;
    use std::cell::RefCell;
    #[cfg(unix)]
    use std::os::unix::process::ExitStatusExt;
    use std::process::{ExitStatus, Output};

    /// Replays one canned stdout and records the argv it was called with.
    struct Canned {
        stdout: &'static str,
        code: i32,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl Canned {
        fn new(stdout: &'static str) -> Self {
            Self {
                stdout,
                code: 0,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessOps for &Canned {
        fn command_output(
            &self,
            program: &str,
            args: &[&str],
            _timeout: Duration,
        ) -> HalResult<Output> {
            let mut argv = vec![program.to_string()];
            argv.extend(args.iter().map(|s| s.to_string()));
            self.calls.borrow_mut().push(argv);
            Ok(Output {
                status: ExitStatus::from_raw(self.code << 8),
                stdout: self.stdout.as_bytes().to_vec(),
                stderr: b"An error occurred (DryRunOperation)".to_vec(),
            })
        }
    }

    const VOLUMES: &str = r#"{
        "Volumes": [
            {
                "VolumeId": "vol-data",
                "Size": 50,
                "Attachments": [{"Device": "/dev/sdf", "InstanceId": "i-1", "State": "attached"}]
            },
            {
                "VolumeId": "vol-root",
                "Size": 100,
                "VolumeType": "gp3",
                "Attachments": [{"Device": "/dev/xvda", "InstanceId": "i-1", "State": "attached"}]
            }
        ]
    }"#;

    #[test]
    fn describe_volumes_filters_by_instance() {
        let canned = Canned::new(VOLUMES);
        let cli = AwsCli::new(&canned, "us-east-1");
        let volumes = cli.describe_volumes("i-1").unwrap();

        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[1].volume_id, "vol-root");
        assert_eq!(volumes[1].size, 100);
        assert!(volumes[1].is_attached_as("/dev/xvda"));
        assert!(!volumes[0].is_attached_as("/dev/xvda"));

        let calls = canned.calls.borrow();
        assert_eq!(
            calls[0],
            vec![
                "aws",
                "ec2",
                "describe-volumes",
                "--region",
                "us-east-1",
                "--filters",
                "Name=attachment.instance-id,Values=i-1",
                "--output",
                "json"
            ]
        );
    }

    #[test]
    fn modify_volume_passes_dry_run_flag() {
        let canned = Canned::new(
            r#"{"VolumeModification": {"VolumeId": "vol-root", "ModificationState": "modifying", "TargetSize": 110, "OriginalSize": 100}}"#,
        );
        let cli = AwsCli::new(&canned, "us-east-1");
        let request = ResizeRequest {
            volume_id: "vol-root".to_string(),
            new_size: 110,
            dry_run: true,
        };
        let modification = cli.modify_volume(&request).unwrap();

        assert_eq!(modification.modification_state, ModificationState::Modifying);
        assert_eq!(modification.target_size, Some(110));
        let calls = canned.calls.borrow();
        assert!(calls[0].contains(&"--dry-run".to_string()));
        assert!(calls[0].windows(2).any(|w| w[0] == "--size" && w[1] == "110"));
    }

    #[test]
    fn failed_cli_call_is_command_failed() {
        let mut canned = Canned::new("");
        canned.code = 254;
        let cli = AwsCli::new(&canned, "us-east-1");
        let err = cli.describe_volumes("i-1").unwrap_err();
        assert!(matches!(err, HalError::CommandFailed { code: Some(254), .. }));
    }

    #[test]
    fn latest_modification_takes_last_record() {
        let json = r#"{"VolumesModifications": [
            {"VolumeId": "vol-root", "ModificationState": "completed"},
            {"VolumeId": "vol-root", "ModificationState": "optimizing", "Progress": 40}
        ]}"#;
        let modification = parse_latest_modification("vol-root", json).unwrap();
        assert_eq!(modification.modification_state, ModificationState::Optimizing);
        assert_eq!(modification.progress, Some(40));
    }

    #[test]
    fn latest_modification_requires_a_record() {
        let err = parse_latest_modification("vol-root", r#"{"VolumesModifications": []}"#)
            .unwrap_err();
        assert!(err.to_string().contains("vol-root"));
    }

    #[test]
    fn unknown_states_deserialize() {
        let json = r#"{"VolumeModification": {"VolumeId": "v", "ModificationState": "paused"}}"#;
        let modification = parse_modify_volume(json).unwrap();
        assert_eq!(modification.modification_state, ModificationState::Unknown);
        assert!(!modification.is_completed());
    }
}
