//! User-facing notifications.

use std::sync::Mutex;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Informational message.
    Info,
    /// Something the user asked for failed.
    Error,
}

/// Remediation the user can trigger from a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Re-open the license key prompt.
    ChangeLicenseKey,
}

impl NotificationAction {
    /// Button label for the action.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ChangeLicenseKey => "Change license key",
        }
    }
}

/// A message for the user, optionally carrying an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: Level,
    /// Message text.
    pub message: String,
    /// Optional remediation.
    pub action: Option<NotificationAction>,
}

impl Notification {
    /// Create an informational notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
            action: None,
        }
    }

    /// Create an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            action: None,
        }
    }

    /// Attach an action.
    #[must_use]
    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// Surface that shows notifications to the user.
pub trait Notifier: Send + Sync {
    /// Show a notification.
    fn notify(&self, notification: Notification);
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        let action = notification.action.map(NotificationAction::label);
        match notification.level {
            Level::Info => tracing::info!(action = ?action, "{}", notification.message),
            Level::Error => tracing::error!(action = ?action, "{}", notification.message),
        }
    }
}

/// Notifier that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .notifications
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::info("hello"));
        notifier.notify(
            Notification::error("bad key").with_action(NotificationAction::ChangeLicenseKey),
        );

        let recorded = notifier.take();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].level, Level::Info);
        assert_eq!(recorded[1].action, Some(NotificationAction::ChangeLicenseKey));
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_action_label() {
        assert_eq!(
            NotificationAction::ChangeLicenseKey.label(),
            "Change license key"
        );
    }
}
