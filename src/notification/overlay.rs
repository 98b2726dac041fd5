//! On-screen overlay shown when an interval completes.
//!
//! The overlay is a transient, critical notification held on screen for a
//! fixed duration and then closed. It runs on its own detached thread so the
//! engine keeps ticking while it is visible.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::content::APP_TITLE;
use super::error::NotificationError;
use super::Overlay;

/// Overlay backed by the desktop notification server.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopOverlay;

impl DesktopOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Shows `text` and blocks the calling thread for `duration_secs`.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::OverlayUnavailable` if the notification
    /// server cannot be reached.
    pub fn run_blocking(text: &str, duration_secs: u32) -> Result<(), NotificationError> {
        let duration_ms = duration_secs.saturating_mul(1000);
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(APP_TITLE)
            .summary(text)
            .timeout(notify_rust::Timeout::Milliseconds(duration_ms));

        #[cfg(all(unix, not(target_os = "macos")))]
        notification
            .urgency(notify_rust::Urgency::Critical)
            .hint(notify_rust::Hint::Transient(true));

        let handle = notification
            .show()
            .map_err(|e| NotificationError::OverlayUnavailable(e.to_string()))?;

        debug!(text, duration_secs, "overlay shown");
        thread::sleep(Duration::from_millis(u64::from(duration_ms)));

        #[cfg(all(unix, not(target_os = "macos")))]
        handle.close();
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        drop(handle);

        Ok(())
    }
}

impl Overlay for DesktopOverlay {
    fn show(&self, text: &str, duration_secs: u32) -> Result<(), NotificationError> {
        let text = text.to_string();
        thread::Builder::new()
            .name("overlay".to_string())
            .spawn(move || {
                if let Err(e) = Self::run_blocking(&text, duration_secs) {
                    warn!(error = %e, "overlay failed");
                }
            })
            .map(drop)
            .map_err(|e| NotificationError::SpawnFailed(e.to_string()))
    }
}
