//! Notification system error types.

use thiserror::Error;

/// Errors that can occur while delivering a notification or overlay.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The notification server rejected or never received the notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// No display or notification server could be reached for the overlay.
    #[error("overlay display not available: {0}")]
    OverlayUnavailable(String),

    /// The overlay thread could not be started.
    #[error("failed to start overlay thread: {0}")]
    SpawnFailed(String),
}

impl NotificationError {
    /// Returns true if the failure concerns the display target.
    #[must_use]
    pub fn is_display_error(&self) -> bool {
        matches!(self, Self::OverlayUnavailable(_))
    }
}
