//! Desktop notification and overlay channels.
//!
//! Interval completion reaches the user through two independent channels: a
//! desktop notification that stays up for the configured delay, and a short
//! overlay. Neither channel reports failure back to the engine; delivery
//! problems are logged and the timer carries on.

mod content;
pub mod error;
mod overlay;

use std::sync::Mutex;

use tracing::{debug, warn};

pub use self::content::{
    NotificationContent, NotificationType, APP_TITLE, BREAK_COMPLETE_MESSAGE,
    FOCUS_COMPLETE_MESSAGE, OVERLAY_DURATION_SECS,
};
pub use self::error::NotificationError;
pub use self::overlay::DesktopOverlay;

// ============================================================================
// Traits
// ============================================================================

/// Sends desktop notifications.
pub trait NotificationSender: Send + Sync {
    /// Shows a notification for `timeout_ms` milliseconds.
    fn notify(&self, title: &str, message: &str, timeout_ms: u32);
}

/// Shows a transient on-screen overlay.
pub trait Overlay: Send + Sync {
    /// Displays `text` for `duration_secs` seconds without blocking the caller.
    ///
    /// # Errors
    ///
    /// Returns an error only if the overlay could not be dispatched at all.
    fn show(&self, text: &str, duration_secs: u32) -> Result<(), NotificationError>;
}

// ============================================================================
// DesktopNotifier
// ============================================================================

/// Notification sender backed by `notify-rust`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Sends a notification and reports failure.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::SendFailed` if the notification server
    /// rejects the request.
    pub fn try_notify(&self, title: &str, message: &str, timeout_ms: u32) -> Result<(), NotificationError> {
        notify_rust::Notification::new()
            .appname(APP_TITLE)
            .summary(title)
            .body(message)
            .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
            .show()
            .map(drop)
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}

impl NotificationSender for DesktopNotifier {
    fn notify(&self, title: &str, message: &str, timeout_ms: u32) {
        match self.try_notify(title, message, timeout_ms) {
            Ok(()) => debug!(title, message, timeout_ms, "notification sent"),
            Err(e) => warn!(error = %e, "system notification failed"),
        }
    }
}

// ============================================================================
// Mocks
// ============================================================================

/// Mock notification sender for testing.
#[derive(Debug, Default)]
pub struct MockNotificationSender {
    calls: Mutex<Vec<NotificationContent>>,
}

impl MockNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_calls(&self) -> Vec<NotificationContent> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl NotificationSender for MockNotificationSender {
    fn notify(&self, title: &str, message: &str, timeout_ms: u32) {
        self.calls.lock().unwrap().push(NotificationContent {
            title: title.to_string(),
            message: message.to_string(),
            timeout_ms,
        });
    }
}

/// Mock overlay for testing.
#[derive(Debug, Default)]
pub struct MockOverlay {
    calls: Mutex<Vec<(String, u32)>>,
}

impl MockOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn show_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Overlay for MockOverlay {
    fn show(&self, text: &str, duration_secs: u32) -> Result<(), NotificationError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), duration_secs));
        Ok(())
    }
}
