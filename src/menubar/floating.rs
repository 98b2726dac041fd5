//! Floating chronometer window.
//!
//! A compact, always-on-top status display showing the mode label, the
//! countdown and a small state image, with play/pause and stop buttons.
//! Visibility is toggled by the user; while hidden it receives no updates.

use crate::types::TimerState;

use super::icon::format_time;

/// Image shown next to the chronometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatingImage {
    /// Idle, or running a focus interval
    Default,
    /// Paused
    Paused,
    /// Running a short or long break
    Break,
}

/// Image on the play/pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPauseImage {
    /// Offer to start or resume
    Play,
    /// Offer to pause; shown only while running
    Pause,
}

impl PlayPauseImage {
    /// Returns the image for `state`.
    #[must_use]
    pub fn for_state(state: &TimerState) -> Self {
        if state.is_running() {
            Self::Pause
        } else {
            Self::Play
        }
    }

    /// Returns the button glyph.
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Play => "▶",
            Self::Pause => "⏸",
        }
    }
}

/// Content of the floating window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatingView {
    /// Mode label ("Pomodoro", "Short Break", "Long Break")
    pub mode_label: String,
    /// Countdown as `MM:SS`
    pub chronometer: String,
    /// State image
    pub image: FloatingImage,
    /// Play/pause button image
    pub play_pause: PlayPauseImage,
}

impl FloatingView {
    /// Derives the floating window content from `state`.
    #[must_use]
    pub fn from_state(state: &TimerState) -> Self {
        let image = if !state.is_active() {
            FloatingImage::Default
        } else if state.is_paused() {
            FloatingImage::Paused
        } else if state.mode.is_break() {
            FloatingImage::Break
        } else {
            FloatingImage::Default
        };

        Self {
            mode_label: state.mode.label().to_string(),
            chronometer: format_time(state.remaining_seconds),
            image,
            play_pause: PlayPauseImage::for_state(state),
        }
    }

    /// Single-line rendering used where only a text title is available.
    #[must_use]
    pub fn title(&self) -> String {
        let marker = match self.image {
            FloatingImage::Default => "🍅",
            FloatingImage::Paused => "⏸",
            FloatingImage::Break => "☕",
        };
        format!("{} {} {}", marker, self.mode_label, self.chronometer)
    }
}

/// Visibility and last rendered content of the floating window.
#[derive(Debug, Default)]
pub struct FloatingWindow {
    enabled: bool,
    last_view: Option<FloatingView>,
}

impl FloatingWindow {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_view: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flips visibility and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Stores `view` if the window is visible. Returns true if stored.
    pub fn render(&mut self, view: FloatingView) -> bool {
        if !self.enabled {
            return false;
        }
        self.last_view = Some(view);
        true
    }

    #[must_use]
    pub fn last_view(&self) -> Option<&FloatingView> {
        self.last_view.as_ref()
    }
}
