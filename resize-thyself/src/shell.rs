//! External command execution with dry-run suppression.

use crate::errors::{ResizeError, Result};
use resize_hal::{HalError, ProcessOps};
use std::time::Duration;

/// Result of a mutating command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Suppressed by dry run; only logged.
    DryRun,
    Completed(String),
    /// Exited non-zero in a way the caller declared harmless.
    NoOp(String),
}

pub struct ShellExecutor<'a> {
    process: &'a dyn ProcessOps,
    dry_run: bool,
}

impl<'a> ShellExecutor<'a> {
    pub fn new(process: &'a dyn ProcessOps, dry_run: bool) -> Self {
        Self { process, dry_run }
    }

    /// Run a read-only command. Always executes, even under dry run.
    pub fn query(&self, program: &str, args: &[&str], timeout: Duration) -> Result<String> {
        log::debug!("Running '{}'", render(program, args));
        let stdout = self
            .process
            .command_stdout(program, args, timeout)
            .map_err(ResizeError::Subprocess)?;
        log::debug!("{} output:\n{}", program, stdout.trim_end());
        Ok(stdout)
    }

    /// Run a command that changes the system.
    pub fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<Outcome> {
        self.run_accepting(program, args, timeout, |_, _| false)
    }

    /// Like [`run`](Self::run), but a non-zero exit for which `is_no_op(code, stdout)`
    /// holds is reported as [`Outcome::NoOp`] instead of an error.
    pub fn run_accepting(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
        is_no_op: impl Fn(Option<i32>, &str) -> bool,
    ) -> Result<Outcome> {
        let command = render(program, args);
        if self.dry_run {
            log::info!("DRY RUN: would run '{}'", command);
            return Ok(Outcome::DryRun);
        }

        log::info!("Running '{}'", command);
        let output = self
            .process
            .command_output(program, args, timeout)
            .map_err(ResizeError::Subprocess)?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        log::debug!("{} output:\n{}", program, stdout.trim_end());

        if output.status.success() {
            return Ok(Outcome::Completed(stdout));
        }
        let code = output.status.code();
        if is_no_op(code, &stdout) {
            log::info!("{} had nothing to do", program);
            return Ok(Outcome::NoOp(stdout));
        }
        Err(ResizeError::Subprocess(HalError::CommandFailed {
            program: program.to_string(),
            code,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }))
    }
}

fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
