//! Child process execution with a hard wall-clock limit
//!
//! The limit covers the whole run: spawn, wait and reading both pipes to
//! EOF. A grandchild that keeps a pipe open cannot extend it.

use std::io::ErrorKind;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use crate::error::ProcessError;

/// Captured result of a finished child
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Run a command to completion, killing it once `timeout` elapses.
/// Stdin is closed; stdout and stderr are captured.
pub fn run_with_timeout(
    command: Command,
    timeout: Duration,
) -> Result<ProcessOutput, ProcessError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ProcessError::Runtime)?;

    runtime.block_on(run(command, timeout))
}

async fn run(command: Command, timeout: Duration) -> Result<ProcessOutput, ProcessError> {
    let program = command.get_program().to_string_lossy().into_owned();

    let mut command = tokio::process::Command::from(command);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => ProcessError::NotFound(program.clone()),
        _ => ProcessError::Spawn {
            program: program.clone(),
            source: e,
        },
    })?;

    // Dropping the future on timeout drops the child, which kills it
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(ProcessOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
        Ok(Err(e)) => Err(ProcessError::Wait(e)),
        Err(_) => Err(ProcessError::Timeout(timeout.as_secs())),
    }
}
