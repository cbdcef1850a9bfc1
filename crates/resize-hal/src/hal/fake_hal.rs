//! Fake HAL implementation for testing.
//!
//! This implementation records all operations without executing them and
//! answers from scripted state, allowing CI-safe testing of the whole resize
//! workflow without root privileges, real disks, or cloud credentials.

use super::{
    CloudOps, HostOps, MetadataOps, ModificationState, ProcessOps, ResizeRequest, Volume,
    VolumeModification,
};
use crate::{HalError, HalResult};
use std::collections::{HashMap, HashSet, VecDeque};
#[cfg(unix)]
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Command {
        program: String,
        args: Vec<String>,
        timeout_secs: u64,
    },
    DescribeVolumes {
        instance_id: String,
    },
    ModifyVolume {
        volume_id: String,
        new_size: u64,
        dry_run: bool,
    },
    DescribeModification {
        volume_id: String,
    },
}

#[derive(Debug, Clone)]
struct ScriptedOutput {
    code: i32,
    stdout: String,
    stderr: String,
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone, Default)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// Paths that answer true to `device_exists`
    devices: HashSet<PathBuf>,
    proc_mounts: String,
    region: Option<String>,
    instance_id: Option<String>,
    root_device: Option<String>,
    volumes: Vec<Volume>,
    commands: HashMap<String, ScriptedOutput>,
    modify_state: Option<ModificationState>,
    modify_error: Option<String>,
    /// States returned by successive `latest_modification` calls; completed once drained.
    poll_states: VecDeque<ModificationState>,
    poll_error: Option<String>,
}

/// Fake HAL implementation that records operations without executing them.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeHalState::default())),
        }
    }

    fn with_state(self, f: impl FnOnce(&mut FakeHalState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    /// Make `path` visible to `device_exists`.
    pub fn with_device(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with_state(|s| {
            s.devices.insert(path);
        })
    }

    /// Set the contents of the mount table.
    pub fn with_proc_mounts(self, content: impl Into<String>) -> Self {
        let content = content.into();
        self.with_state(|s| s.proc_mounts = content)
    }

    pub fn with_metadata(self, region: &str, instance_id: &str, root_device: &str) -> Self {
        self.with_state(|s| {
            s.region = Some(region.to_string());
            s.instance_id = Some(instance_id.to_string());
            s.root_device = Some(root_device.to_string());
        })
    }

    pub fn with_volume(self, volume: Volume) -> Self {
        self.with_state(|s| s.volumes.push(volume))
    }

    /// Script a successful run of `program` printing `stdout`.
    pub fn with_command_output(self, program: &str, stdout: impl Into<String>) -> Self {
        self.with_command_result(program, 0, stdout, "")
    }

    /// Script any exit status for `program`.
    pub fn with_command_result(
        self,
        program: &str,
        code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        let scripted = ScriptedOutput {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        };
        self.with_state(|s| {
            s.commands.insert(program.to_string(), scripted);
        })
    }

    /// State reported by `modify_volume` (defaults to `modifying`).
    pub fn with_modify_state(self, state: ModificationState) -> Self {
        self.with_state(|s| s.modify_state = Some(state))
    }

    pub fn with_modify_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.with_state(|s| s.modify_error = Some(message))
    }

    pub fn with_poll_states(self, states: impl IntoIterator<Item = ModificationState>) -> Self {
        self.with_state(|s| s.poll_states.extend(states))
    }

    pub fn with_poll_error(self, message: &str) -> Self {
        let message = message.to_string();
        self.with_state(|s| s.poll_error = Some(message))
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    /// Programs run so far, in order.
    pub fn commands_run(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::Command { program, .. } => Some(program),
                _ => None,
            })
            .collect()
    }

    /// Clear all recorded operations.
    pub fn clear(&self) {
        self.state.lock().unwrap().operations.clear();
    }

    fn record_operation(&self, op: Operation) {
        self.state.lock().unwrap().operations.push(op);
    }
}

fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

fn missing(what: &str) -> HalError {
    HalError::MetadataUnavailable(format!("{what} not scripted"))
}

impl ProcessOps for FakeHal {
    fn command_output(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> HalResult<Output> {
        log::info!("FAKE HAL: {} {}", program, args.join(" "));
        self.record_operation(Operation::Command {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout_secs: timeout.as_secs(),
        });

        let scripted = self.state.lock().unwrap().commands.get(program).cloned();
        let scripted = scripted.unwrap_or(ScriptedOutput {
            code: 0,
            stdout: String::new(),
            stderr: String::new(),
        });
        Ok(Output {
            status: exit_status(scripted.code),
            stdout: scripted.stdout.into_bytes(),
            stderr: scripted.stderr.into_bytes(),
        })
    }
}

impl HostOps for FakeHal {
    fn proc_mounts(&self) -> HalResult<String> {
        Ok(self.state.lock().unwrap().proc_mounts.clone())
    }

    fn device_exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().devices.contains(path)
    }
}

impl MetadataOps for FakeHal {
    fn region(&self) -> HalResult<String> {
        self.state
            .lock()
            .unwrap()
            .region
            .clone()
            .ok_or_else(|| missing("region"))
    }

    fn instance_id(&self) -> HalResult<String> {
        self.state
            .lock()
            .unwrap()
            .instance_id
            .clone()
            .ok_or_else(|| missing("instance-id"))
    }

    fn root_block_device(&self) -> HalResult<String> {
        self.state
            .lock()
            .unwrap()
            .root_device
            .clone()
            .ok_or_else(|| missing("block-device-mapping/root"))
    }
}

impl CloudOps for FakeHal {
    fn describe_volumes(&self, instance_id: &str) -> HalResult<Vec<Volume>> {
        self.record_operation(Operation::DescribeVolumes {
            instance_id: instance_id.to_string(),
        });
        Ok(self.state.lock().unwrap().volumes.clone())
    }

    fn modify_volume(&self, request: &ResizeRequest) -> HalResult<VolumeModification> {
        log::info!(
            "FAKE HAL: modify-volume {} -> {} GiB (dry_run={})",
            request.volume_id,
            request.new_size,
            request.dry_run
        );
        self.record_operation(Operation::ModifyVolume {
            volume_id: request.volume_id.clone(),
            new_size: request.new_size,
            dry_run: request.dry_run,
        });

        let state = self.state.lock().unwrap();
        if let Some(message) = &state.modify_error {
            return Err(HalError::Other(message.clone()));
        }
        Ok(VolumeModification {
            volume_id: request.volume_id.clone(),
            modification_state: state.modify_state.unwrap_or(ModificationState::Modifying),
            target_size: Some(request.new_size),
            original_size: None,
            progress: None,
        })
    }

    fn latest_modification(&self, volume_id: &str) -> HalResult<VolumeModification> {
        self.record_operation(Operation::DescribeModification {
            volume_id: volume_id.to_string(),
        });

        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.poll_error {
            return Err(HalError::Other(message.clone()));
        }
        let modification_state = state
            .poll_states
            .pop_front()
            .unwrap_or(ModificationState::Completed);
        Ok(VolumeModification {
            volume_id: volume_id.to_string(),
            modification_state,
            target_size: None,
            original_size: None,
            progress: None,
        })
    }
}
