use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use super::error::BridgeError;
use super::locate::resolve_bridge_program;
use super::runner::{BridgeInvocation, ProcessRunner};

/// Loopback host the emulator exposes its adb endpoint on.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Where one transfer's bridge runs: the resolved executable and the
/// directory it is started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTarget {
    pub program: PathBuf,
    pub working_dir: Option<PathBuf>,
}

/// Thin client over the external bridge executable: `connect` and `push`.
///
/// The configured `bridge_program` is only a name or a path; each transfer
/// resolves it against its own target directory with [`DeviceBridge::target_for`].
pub struct DeviceBridge<R> {
    runner: R,
    bridge_program: PathBuf,
    remote_dir: String,
}

impl<R: ProcessRunner> DeviceBridge<R> {
    pub fn new(runner: R, bridge_program: PathBuf, remote_dir: impl Into<String>) -> Self {
        Self {
            runner,
            bridge_program,
            remote_dir: remote_dir.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Resolve the executable and working directory for a target program
    /// directory. An empty path means "no target": `PATH` lookup and the
    /// current directory.
    pub fn target_for(&self, target_program_path: &Path) -> BridgeTarget {
        let working_dir = (!target_program_path.as_os_str().is_empty())
            .then(|| target_program_path.to_path_buf());
        BridgeTarget {
            program: resolve_bridge_program(&self.bridge_program, working_dir.as_deref()),
            working_dir,
        }
    }

    /// `adb connect 127.0.0.1:<port>`
    #[instrument(skip(self, target), fields(program = ?target.program))]
    pub async fn connect(&self, target: &BridgeTarget, port: u16) -> Result<(), BridgeError> {
        let endpoint = format!("{}:{}", LOOPBACK_HOST, port);
        let invocation = invocation(target, "connect", vec!["connect".into(), endpoint.clone()]);
        self.execute(&invocation).await?;
        info!("Connected to adb endpoint {}", endpoint);
        Ok(())
    }

    /// `adb push <staged_path> <remote_dir>`
    #[instrument(skip(self, target))]
    pub async fn push(&self, target: &BridgeTarget, staged_path: &Path) -> Result<(), BridgeError> {
        let invocation = invocation(
            target,
            "push",
            vec![
                "push".into(),
                staged_path.to_string_lossy().to_string(),
                self.remote_dir.clone(),
            ],
        );
        self.execute(&invocation).await?;
        info!("Pushed {:?} to {}", staged_path, self.remote_dir);
        Ok(())
    }

    async fn execute(&self, invocation: &BridgeInvocation) -> Result<(), BridgeError> {
        let output = self.runner.run(invocation).await?;
        if output.success() {
            return Ok(());
        }

        Err(BridgeError::Exit {
            operation: invocation.operation,
            code: output.code,
            stderr: output.stderr,
        })
    }
}

fn invocation(target: &BridgeTarget, operation: &'static str, args: Vec<String>) -> BridgeInvocation {
    BridgeInvocation {
        operation,
        program: target.program.clone(),
        args,
        working_dir: target.working_dir.clone(),
    }
}
