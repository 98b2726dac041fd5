//! Tray menu configuration.
//!
//! The menu is rebuilt whenever the activity changes. The start entry reads
//! "Pause" while running and "Start" otherwise; "Stop" is only offered while
//! the timer is active.

use crate::types::TimerState;

use super::event::MenuItemId;

// ============================================================================
// MenuItemConfig
// ============================================================================

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Item identifier used to route clicks
    pub id: MenuItemId,
    /// Display text
    pub text: String,
    /// Whether the item is clickable
    pub enabled: bool,
}

impl MenuItemConfig {
    /// Creates an enabled menu item.
    pub fn new(id: MenuItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            enabled: true,
        }
    }
}

// ============================================================================
// MenuConfig
// ============================================================================

/// Complete menu configuration for the current timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// "Start" or "Pause"
    pub start_pause: MenuItemConfig,
    /// "Stop", present only while the timer is active
    pub stop: Option<MenuItemConfig>,
    /// "Toggle Chronometer"
    pub toggle_floating: MenuItemConfig,
    /// "Configure"
    pub configure: MenuItemConfig,
    /// "Quit"
    pub quit: MenuItemConfig,
}

impl MenuConfig {
    /// Returns the items in display order. `None` marks a separator.
    #[must_use]
    pub fn entries(&self) -> Vec<Option<&MenuItemConfig>> {
        let mut entries = vec![Some(&self.start_pause)];
        if let Some(stop) = &self.stop {
            entries.push(Some(stop));
        }
        entries.push(None);
        entries.push(Some(&self.toggle_floating));
        entries.push(Some(&self.configure));
        entries.push(None);
        entries.push(Some(&self.quit));
        entries
    }
}

// ============================================================================
// MenuBuilder
// ============================================================================

/// Builds [`MenuConfig`] from timer state.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, state: &TimerState) -> MenuConfig {
        let start_text = if state.is_running() { "Pause" } else { "Start" };

        MenuConfig {
            start_pause: MenuItemConfig::new(MenuItemId::StartPause, start_text),
            stop: state
                .is_active()
                .then(|| MenuItemConfig::new(MenuItemId::Stop, "Stop")),
            toggle_floating: MenuItemConfig::new(MenuItemId::ToggleFloating, "Toggle Chronometer"),
            configure: MenuItemConfig::new(MenuItemId::Configure, "Configure"),
            quit: MenuItemConfig::new(MenuItemId::Quit, "Quit"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
