//! Sound system error types.
//!
//! Chime playback is fire-and-forget, so these errors never reach the timer
//! engine. They are logged on the playback thread.

use thiserror::Error;

/// Errors that can occur while playing the chime.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no output device).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Chime file was not found at the specified path.
    #[error("chime file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the chime file.
    #[error("failed to decode chime: {0}")]
    DecodeError(String),

    /// Failed to create the audio sink.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// The playback thread could not be started.
    #[error("failed to start playback thread: {0}")]
    SpawnError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the chime file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the generated tone.
    #[must_use]
    pub fn should_fallback_to_tone(&self) -> bool {
        self.is_file_error()
    }
}
