pub mod client;
pub mod error;
pub mod locate;
pub mod runner;

pub use client::{BridgeTarget, DeviceBridge};
pub use error::BridgeError;
pub use locate::resolve_bridge_program;
pub use runner::{BridgeInvocation, ProcessOutput, ProcessRunner, SystemRunner};
