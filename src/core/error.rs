use std::path::PathBuf;
use thiserror::Error;

use crate::core::bridge::BridgeError;

/// Central error type for the transfer backend.
/// Every module returns `Result<T, TransferError>`.
#[derive(Debug, Error)]
pub enum TransferError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Staging ─────────────────────────────────────────
    #[error("Staging failed for {path:?}: {source}")]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not a file path: {0:?}")]
    NoFileName(PathBuf),

    // ── Device bridge ───────────────────────────────────
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    // ── Request ─────────────────────────────────────────
    #[error("Invalid port number: {0:?}")]
    InvalidPort(String),

    #[error("Target program directory does not exist: {0:?}")]
    TargetPath(PathBuf),

    #[error("No files to transfer")]
    NoFiles,

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type TransferResult<T> = Result<T, TransferError>;

impl TransferError {
    /// Errors raised while copying into the staging directory.
    pub fn is_staging(&self) -> bool {
        matches!(
            self,
            TransferError::Staging { .. } | TransferError::NoFileName(_)
        )
    }
}
