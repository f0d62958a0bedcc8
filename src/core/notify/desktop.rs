//! Desktop notification via notify-rust.

use notify_rust::Notification;
use tracing::warn;

use super::{completion_message, LogNotifier, Notifier, APP_TITLE};
use crate::core::transfer::TransferReport;

#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn transfer_complete(&self, report: &TransferReport) {
        let result = Notification::new()
            .appname(APP_TITLE)
            .summary(APP_TITLE)
            .body(&completion_message(report))
            .timeout(notify_rust::Timeout::Milliseconds(5000))
            .show();

        if let Err(e) = result {
            warn!("Desktop notification failed: {}", e);
            LogNotifier.transfer_complete(report);
        }
    }
}
