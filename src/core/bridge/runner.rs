// ─── Process Runner ───
// Runs one device-bridge command to completion and captures its output.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::error::BridgeError;

/// A fully resolved bridge command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeInvocation {
    /// Short name of the bridge operation (`connect`, `push`).
    pub operation: &'static str,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl BridgeInvocation {
    /// Copy/paste friendly rendering for logs.
    pub fn command_line(&self) -> String {
        let program = shell_escape(&self.program.to_string_lossy());
        let args = self
            .args
            .iter()
            .map(|arg| shell_escape(arg))
            .collect::<Vec<_>>()
            .join(" ");

        if args.is_empty() {
            program
        } else {
            format!("{} {}", program, args)
        }
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, invocation: &BridgeInvocation) -> Result<ProcessOutput, BridgeError>;
}

/// Spawns real child processes with `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// A zero duration disables the timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: (!timeout.is_zero()).then_some(timeout),
        }
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &BridgeInvocation) -> Result<ProcessOutput, BridgeError> {
        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }
        configure_platform_spawn(&mut cmd);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!("Command (copy/paste): {}", invocation.command_line());

        let child = cmd.spawn().map_err(|source| BridgeError::Spawn {
            program: invocation.program.to_string_lossy().to_string(),
            source,
        })?;

        let wait = child.wait_with_output();
        let output = match self.timeout {
            // Dropping the timed-out future drops the child, which kills it.
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| BridgeError::TimedOut {
                    operation: invocation.operation,
                    after: limit,
                })?,
            None => wait.await,
        }
        .map_err(|source| BridgeError::Wait {
            operation: invocation.operation,
            source,
        })?;

        let output = ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "adb {} exited with {:?}; stdout={:?} stderr={:?}",
            invocation.operation,
            output.code,
            output.stdout.trim(),
            output.stderr.trim()
        );

        Ok(output)
    }
}

fn configure_platform_spawn(cmd: &mut tokio::process::Command) {
    #[cfg(target_os = "windows")]
    {
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    #[cfg(not(target_os = "windows"))]
    let _ = cmd;
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
