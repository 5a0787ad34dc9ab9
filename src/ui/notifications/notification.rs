// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.

use crate::ui::design_tokens::palette;
use iced::Color;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity level determines display duration and visual styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Operation completed successfully (green, 3s duration).
    #[default]
    Success,
    /// Informational message (blue, 3s duration).
    Info,
    /// Warning that doesn't block operation (orange, 5s duration).
    Warning,
    /// Error requiring attention (red, manual dismiss).
    Error,
}

impl Severity {
    /// Returns the primary color for this severity level.
    #[must_use]
    pub fn color(&self) -> Color {
        match self {
            Severity::Success => palette::SUCCESS_500,
            Severity::Info => palette::INFO_500,
            Severity::Warning => palette::WARNING_500,
            Severity::Error => palette::ERROR_500,
        }
    }

    /// Returns the auto-dismiss duration, or `None` for errors which stay
    /// until dismissed.
    #[must_use]
    pub fn auto_dismiss_duration(&self) -> Option<Duration> {
        match self {
            Severity::Success | Severity::Info => Some(Duration::from_secs(3)),
            Severity::Warning => Some(Duration::from_secs(5)),
            Severity::Error => None,
        }
    }
}

/// A notification to be displayed to the user.
///
/// The message is an i18n key resolved at render time, optionally with
/// interpolation arguments.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    severity: Severity,
    message_key: String,
    message_args: Vec<(String, String)>,
    created_at: Instant,
}

impl Notification {
    /// Creates a new notification with the given severity and message key.
    pub fn new(severity: Severity, message_key: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            severity,
            message_key: message_key.into(),
            message_args: Vec::new(),
            created_at: Instant::now(),
        }
    }

    /// Creates a success notification.
    pub fn success(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Success, message_key)
    }

    /// Creates an info notification.
    pub fn info(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Info, message_key)
    }

    /// Creates a warning notification.
    pub fn warning(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message_key)
    }

    /// Creates an error notification.
    pub fn error(message_key: impl Into<String>) -> Self {
        Self::new(Severity::Error, message_key)
    }

    /// Adds an argument for message interpolation.
    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((key.into(), value.into()));
        self
    }

    /// Returns the notification's unique ID.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the severity level.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the i18n message key.
    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    /// Returns the message arguments for interpolation.
    #[must_use]
    pub fn message_args(&self) -> &[(String, String)] {
        &self.message_args
    }

    /// Returns whether this notification's display time has elapsed.
    #[must_use]
    pub fn should_auto_dismiss(&self) -> bool {
        match self.severity.auto_dismiss_duration() {
            Some(duration) => self.created_at.elapsed() >= duration,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_ids_are_unique() {
        let n1 = Notification::success("test");
        let n2 = Notification::success("test");
        assert_ne!(n1.id(), n2.id());
    }

    #[test]
    fn error_severity_has_no_auto_dismiss() {
        assert!(Severity::Error.auto_dismiss_duration().is_none());
    }

    #[test]
    fn warning_duration_is_longer_than_success() {
        let success = Severity::Success.auto_dismiss_duration().unwrap();
        let warning = Severity::Warning.auto_dismiss_duration().unwrap();
        assert!(warning > success);
    }

    #[test]
    fn builder_collects_interpolation_args() {
        let notification = Notification::error("test-error")
            .with_arg("filename", "codes.png")
            .with_arg("count", "3");

        assert_eq!(notification.severity(), Severity::Error);
        assert_eq!(notification.message_args().len(), 2);
    }

    #[test]
    fn constructors_set_correct_severity() {
        assert_eq!(Notification::success("").severity(), Severity::Success);
        assert_eq!(Notification::info("").severity(), Severity::Info);
        assert_eq!(Notification::warning("").severity(), Severity::Warning);
        assert_eq!(Notification::error("").severity(), Severity::Error);
    }
}
