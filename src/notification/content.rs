//! Notification content for interval completion.

use crate::types::TimerSettings;

/// Application title used for notifications and the tray tooltip when idle.
pub const APP_TITLE: &str = "Pomodoro Timer";

/// Message shown when a focus interval ends.
pub const FOCUS_COMPLETE_MESSAGE: &str = "Pomodoro session ended!";

/// Message shown when a break ends.
pub const BREAK_COMPLETE_MESSAGE: &str = "Break ended! Unpause to continue.";

/// How long the overlay stays on screen, in seconds.
pub const OVERLAY_DURATION_SECS: u32 = 2;

/// Kinds of completion notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// A focus interval completed.
    FocusComplete,
    /// A short or long break completed.
    BreakComplete,
}

impl NotificationType {
    /// Returns the message body for this notification.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::FocusComplete => FOCUS_COMPLETE_MESSAGE,
            Self::BreakComplete => BREAK_COMPLETE_MESSAGE,
        }
    }
}

/// A fully resolved notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Summary line
    pub title: String,
    /// Body text, also used as overlay text
    pub message: String,
    /// Display timeout in milliseconds
    pub timeout_ms: u32,
}

impl NotificationContent {
    /// Builds the content for `kind` using the configured timeout.
    #[must_use]
    pub fn for_completion(kind: NotificationType, settings: &TimerSettings) -> Self {
        Self {
            title: APP_TITLE.to_string(),
            message: kind.message().to_string(),
            timeout_ms: settings.notification_timeout_ms(),
        }
    }
}
