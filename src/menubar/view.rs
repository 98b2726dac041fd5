//! Derived view state shared by every presentation surface.

use crate::types::TimerState;

use super::floating::{FloatingView, PlayPauseImage};
use super::icon::{select_icon, tooltip, IconId};

/// Everything a surface needs to render, recomputable from [`TimerState`]
/// at any instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Tray icon
    pub icon: IconId,
    /// Tray tooltip
    pub tooltip: String,
    /// Floating window content
    pub floating: FloatingView,
    /// Play/pause button image
    pub play_pause: PlayPauseImage,
}

impl ViewState {
    #[must_use]
    pub fn from_state(state: &TimerState) -> Self {
        Self {
            icon: select_icon(state),
            tooltip: tooltip(state),
            floating: FloatingView::from_state(state),
            play_pause: PlayPauseImage::for_state(state),
        }
    }
}
