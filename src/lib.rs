//! pomotray library
//!
//! This library provides the core of the tray-resident Pomodoro timer.
//! It includes:
//! - Timer engine, tick source and the daemon's event loop
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - Type definitions for settings, state and the IPC protocol
//! - The flat-file config store and its validation form
//! - Tray surfaces: icon tiers, tooltip, floating chronometer, menu
//! - Desktop notifications and the on-screen overlay
//! - Chime playback

pub mod cli;
pub mod config;
pub mod daemon;
pub mod menubar;
pub mod notification;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Activity, IpcRequest, IpcResponse, Mode, ResponseData, SettingsParams, TimerSettings,
    TimerState,
};

pub use config::{ConfigError, ConfigStore, SettingsForm};

pub use daemon::{
    Channels, EngineCommand, ManualTickSource, RequestHandler, TickSource, TimerEngine,
    TimerEvent, TokioTickSource,
};

pub use menubar::{
    EventHandler, IconId, IconManager, MenuAction, MenuBuilder, MenuConfig, MenuItemConfig,
    MenuItemId, TrayIconManager, TrayUpdate, ViewState,
};

pub use notification::{
    MockNotificationSender, MockOverlay, NotificationContent, NotificationError,
    NotificationSender, NotificationType, Overlay,
};

pub use sound::{ChimePlayer, ChimeSource, MockChimePlayer, RodioChimePlayer, SoundError};
