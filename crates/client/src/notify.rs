//! [`Notifier`] that forwards editor notifications to `tracing`.

use routemix_core::notify::{NoticeLevel, Notifier};

/// Logs each notification at the matching `tracing` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => tracing::info!(message, "Load balance notice"),
            NoticeLevel::Warning => tracing::warn!(message, "Load balance notice"),
            NoticeLevel::Error => tracing::error!(message, "Load balance notice"),
        }
    }
}
