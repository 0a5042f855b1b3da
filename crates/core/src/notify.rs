//! Operator-facing notifications.
//!
//! The editor never talks to a UI directly; it reports outcomes through a
//! [`Notifier`] handed to it at construction. Any `Fn(NoticeLevel, &str)`
//! closure is a notifier.

use serde::Serialize;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(NoticeLevel, &str) + Send + Sync,
{
    fn notify(&self, level: NoticeLevel, message: &str) {
        self(level, message)
    }
}
