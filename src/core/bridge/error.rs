use std::time::Duration;

use thiserror::Error;

/// Failures of a single device-bridge invocation.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Could not start {program:?}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The process started but collecting its exit status or output failed.
    #[error("adb {operation} failed while waiting for exit: {source}")]
    Wait {
        operation: &'static str,
        source: std::io::Error,
    },

    #[error("adb {operation} exited with {}: {}", describe_code(.code), .stderr.trim())]
    Exit {
        operation: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("adb {operation} timed out after {}s", .after.as_secs())]
    TimedOut {
        operation: &'static str,
        after: Duration,
    },
}

impl BridgeError {
    /// Captured standard error of a failed invocation, if the process ran.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            BridgeError::Exit { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
