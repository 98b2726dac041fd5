//! Event types for tray interactions.
//!
//! Clicks travel from the tray thread to the engine as [`MenuAction`]s;
//! rendering travels the other way as [`TrayUpdate`]s.

use std::fmt;

use super::floating::FloatingView;
use super::icon::IconId;
use super::menu::MenuConfig;

// ============================================================================
// MenuAction
// ============================================================================

/// Actions that can be triggered from the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start from idle, otherwise pause or resume
    Toggle,
    /// Stop the timer
    Stop,
    /// Show or hide the floating chronometer
    ToggleFloating,
    /// Open the configuration
    Configure,
    /// Quit the daemon
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuAction::Toggle => "toggle",
            MenuAction::Stop => "stop",
            MenuAction::ToggleFloating => "toggle_floating",
            MenuAction::Configure => "configure",
            MenuAction::Quit => "quit",
        })
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for menu items.
///
/// On macOS these are the string ids given to the native menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    /// "Start" / "Pause"
    StartPause,
    /// "Stop"
    Stop,
    /// "Toggle Chronometer"
    ToggleFloating,
    /// "Configure"
    Configure,
    /// "Quit"
    Quit,
    /// Unknown or unhandled menu item
    Unknown,
}

impl MenuItemId {
    /// Returns the native id string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemId::StartPause => "start_pause",
            MenuItemId::Stop => "stop",
            MenuItemId::ToggleFloating => "toggle_floating",
            MenuItemId::Configure => "configure",
            MenuItemId::Quit => "quit",
            MenuItemId::Unknown => "unknown",
        }
    }

    /// Parses a native id string.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        match id {
            "start_pause" => MenuItemId::StartPause,
            "stop" => MenuItemId::Stop,
            "toggle_floating" => MenuItemId::ToggleFloating,
            "configure" => MenuItemId::Configure,
            "quit" => MenuItemId::Quit,
            _ => MenuItemId::Unknown,
        }
    }

    /// Converts a menu item ID to the corresponding action.
    #[must_use]
    pub fn to_action(&self) -> Option<MenuAction> {
        match self {
            MenuItemId::StartPause => Some(MenuAction::Toggle),
            MenuItemId::Stop => Some(MenuAction::Stop),
            MenuItemId::ToggleFloating => Some(MenuAction::ToggleFloating),
            MenuItemId::Configure => Some(MenuAction::Configure),
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Converts menu clicks into actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Returns the action for `item_id`, or `None` for unknown items.
    pub fn handle_click(&self, item_id: MenuItemId) -> Option<MenuAction> {
        let action = item_id.to_action();
        match action {
            Some(ref action) => tracing::info!(action = %action, "menu action received"),
            None => tracing::debug!(item = item_id.as_str(), "ignoring menu click"),
        }
        action
    }
}

// ============================================================================
// TrayUpdate
// ============================================================================

/// Rendering updates sent from the engine to the tray thread.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// Replace the tooltip text
    SetTooltip(String),
    /// Repaint the icon
    SetIcon(IconId),
    /// Refresh the floating chronometer
    Floating(FloatingView),
    /// Show or hide the floating chronometer
    SetFloatingVisible(bool),
    /// Replace the menu
    RebuildMenu(MenuConfig),
    /// Tear the tray down
    Shutdown,
}

// ============================================================================
// Tests
// ============================================================================
