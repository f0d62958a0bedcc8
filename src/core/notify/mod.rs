// ─── Completion Notification ───
// The only user-facing signal of a finished transfer. Failures stay in the
// log and the command summary.

#[cfg(feature = "desktop-notify")]
pub mod desktop;

use tracing::info;

use crate::core::transfer::TransferReport;

pub const APP_TITLE: &str = "CrossCore Mod Transfer";

pub trait Notifier: Send + Sync {
    /// Called once per transfer whose staging and connect both succeeded.
    fn transfer_complete(&self, report: &TransferReport);
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn transfer_complete(&self, report: &TransferReport) {
        (**self).transfer_complete(report)
    }
}

/// Prints the completion message to the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn transfer_complete(&self, report: &TransferReport) {
        let message = completion_message(report);
        info!(transfer = %report.id, "{}", message);
        println!("{}: {}", APP_TITLE, message);
    }
}

/// Notifier that does nothing; used by `push --no-notify`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn transfer_complete(&self, _report: &TransferReport) {}
}

pub fn completion_message(report: &TransferReport) -> String {
    let failed = report.failed_pushes().count();
    if failed == 0 {
        "File transfer complete!".to_string()
    } else {
        format!(
            "File transfer complete! {} of {} file(s) could not be pushed, see the log.",
            failed,
            report.pushes.len()
        )
    }
}

/// Default notifier for the current build.
pub fn default_notifier() -> Box<dyn Notifier> {
    #[cfg(feature = "desktop-notify")]
    return Box::new(desktop::DesktopNotifier);

    #[cfg(not(feature = "desktop-notify"))]
    return Box::new(LogNotifier);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct RecordingNotifier {
        pub messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn count(&self) -> usize {
            self.messages.lock().unwrap().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn transfer_complete(&self, report: &TransferReport) {
            self.messages
                .lock()
                .unwrap()
                .push(completion_message(report));
        }
    }
}
