// ─── CrossCore Mod Transfer Core ───
// Stages mod files locally and pushes them to the emulator through adb.
//
// Architecture:
//   core/
//     staging/  — Scratch directory: copy by base name, best-effort cleanup
//     bridge/   — adb connect/push over a swappable process runner
//     transfer/ — Request/report model + orchestrator state machine
//     session/  — Files queued for the next transfer
//     notify/   — Completion notification (console or desktop)
//     state/    — Persisted settings

pub mod bridge;
pub mod error;
pub mod notify;
pub mod session;
pub mod staging;
pub mod state;
pub mod transfer;
