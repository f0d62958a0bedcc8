use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

use crate::core::bridge::BridgeError;
use crate::core::error::TransferError;

/// Everything one user-initiated transfer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Emulator shell directory. The bridge is resolved against it and run
    /// from it; empty means `PATH` lookup from the current directory.
    pub target_program_path: PathBuf,
    pub port: u16,
    /// Source files in the order they were queued.
    pub file_paths: Vec<PathBuf>,
}

/// Lifecycle of a transfer.
///
/// `Failed` is only entered from `Staging` or `Connecting`; both paths still
/// go through `CleaningUp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Idle,
    Staging,
    Connecting,
    Pushing,
    Failed,
    CleaningUp,
    Done,
}

impl std::fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferPhase::Idle => write!(f, "idle"),
            TransferPhase::Staging => write!(f, "staging"),
            TransferPhase::Connecting => write!(f, "connecting"),
            TransferPhase::Pushing => write!(f, "pushing"),
            TransferPhase::Failed => write!(f, "failed"),
            TransferPhase::CleaningUp => write!(f, "cleaning-up"),
            TransferPhase::Done => write!(f, "done"),
        }
    }
}

/// Result of pushing one staged file.
#[derive(Debug)]
pub struct PushOutcome {
    pub staged_path: PathBuf,
    pub error: Option<BridgeError>,
}

impl PushOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// What happened during one transfer.
#[derive(Debug)]
pub struct TransferReport {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub phase: TransferPhase,
    /// Staging or connect error that stopped the workflow.
    pub failure: Option<TransferError>,
    pub staged: Vec<PathBuf>,
    pub pushes: Vec<PushOutcome>,
    /// Swallowed; kept for diagnostics only.
    pub cleanup_error: Option<TransferError>,
    pub notified: bool,
}

impl TransferReport {
    pub(crate) fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            phase: TransferPhase::Idle,
            failure: None,
            staged: Vec::new(),
            pushes: Vec::new(),
            cleanup_error: None,
            notified: false,
        }
    }

    /// Staging and connect both went through. Individual pushes may still have failed.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failed_pushes(&self) -> impl Iterator<Item = &PushOutcome> {
        self.pushes.iter().filter(|outcome| !outcome.succeeded())
    }

    pub fn pushed_count(&self) -> usize {
        self.pushes.iter().filter(|outcome| outcome.succeeded()).count()
    }
}
