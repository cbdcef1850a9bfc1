//! Process execution helpers.
//!
//! External commands are "world-touching" and must go through the HAL so the
//! resize workflow can be tested without spawning real processes.

use crate::HalResult;
use std::process::Output;
use std::time::Duration;

/// Process execution trait (external command runner).
pub trait ProcessOps {
    /// Run `program` and return its raw output, whatever the exit status.
    fn command_output(&self, program: &str, args: &[&str], timeout: Duration)
        -> HalResult<Output>;

    /// Run `program` and return its stdout, failing on a non-zero exit status.
    fn command_stdout(&self, program: &str, args: &[&str], timeout: Duration) -> HalResult<String> {
        let output = self.command_output(program, args, timeout)?;
        if !output.status.success() {
            return Err(output_failed(program, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

pub(crate) fn output_failed(program: &str, output: &Output) -> crate::HalError {
    crate::HalError::CommandFailed {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
