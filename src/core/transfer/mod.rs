pub mod model;
pub mod orchestrator;

pub use model::{PushOutcome, TransferPhase, TransferReport, TransferRequest};
pub use orchestrator::TransferOrchestrator;
