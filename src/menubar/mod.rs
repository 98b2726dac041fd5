//! Tray surfaces for the Pomodoro timer.
//!
//! - `icon.rs`: icon tier selection, tooltip text, built-in icon rendering
//! - `floating.rs`: floating chronometer content and visibility
//! - `view.rs`: the combined view state derived from timer state
//! - `menu.rs`: menu configuration
//! - `event.rs`: click and update message types
//! - `linux.rs`: StatusNotifierItem backend (Linux only)
//! - `mod.rs`: [`TrayIconManager`], the platform tray
//!
//! The engine never touches the tray directly. It sends [`TrayUpdate`]s over
//! a crossbeam channel and the manager applies them on its own thread. On
//! macOS the manager drives a `tray-icon` status item (and must run on the
//! main thread). On Linux it publishes a StatusNotifierItem through `ksni`.
//! Elsewhere it keeps the rendered state and logs it, and the CLI is the
//! command surface.

pub mod event;
pub mod floating;
pub mod icon;
pub mod menu;
pub mod view;

#[cfg(target_os = "linux")]
mod linux;

pub use event::{EventHandler, MenuAction, MenuItemId, TrayUpdate};
pub use floating::{FloatingImage, FloatingView, FloatingWindow, PlayPauseImage};
pub use icon::{format_time, select_icon, tooltip, IconId, IconManager, IDLE_TOOLTIP};
pub use menu::{MenuBuilder, MenuConfig, MenuItemConfig};
pub use view::ViewState;

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, info, warn};

use crate::types::TimerState;

/// How long the tray loop waits for an update before polling clicks.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Edge length of the built-in tray icon, in pixels.
#[cfg(any(target_os = "macos", target_os = "linux"))]
const ICON_SIZE: u32 = 22;

// ============================================================================
// TrayIconManager
// ============================================================================

/// Applies [`TrayUpdate`]s to the platform tray and reports clicks.
pub struct TrayIconManager {
    /// Click routing
    #[cfg_attr(
        not(any(target_os = "macos", target_os = "linux")),
        allow(dead_code)
    )]
    event_handler: EventHandler,
    /// Floating chronometer state
    floating: FloatingWindow,
    /// Last applied tooltip
    tooltip: String,
    /// Last applied icon
    icon: IconId,
    /// Last applied menu
    menu: MenuConfig,
    /// Channel for receiving updates from the engine
    update_rx: Receiver<TrayUpdate>,
    /// Whether the tray has been created
    initialized: bool,
    /// Set once a shutdown update has been applied
    shutdown_requested: bool,
    /// Platform-specific tray icon instance (macOS only)
    #[cfg(target_os = "macos")]
    tray_icon: Option<tray_icon::TrayIcon>,
    /// StatusNotifierItem service (Linux only)
    #[cfg(target_os = "linux")]
    native: linux::NativeTray,
}

impl TrayIconManager {
    /// Creates a manager showing `initial_state`.
    ///
    /// The native tray is not created until [`initialize`](Self::initialize).
    pub fn new(
        initial_state: &TimerState,
        floating_visible: bool,
        update_rx: Receiver<TrayUpdate>,
    ) -> Self {
        let mut floating = FloatingWindow::new(floating_visible);
        floating.render(FloatingView::from_state(initial_state));

        Self {
            event_handler: EventHandler::new(),
            floating,
            tooltip: IDLE_TOOLTIP.to_string(),
            icon: IconId::Default,
            menu: MenuBuilder::new().build(initial_state),
            update_rx,
            initialized: false,
            shutdown_requested: false,
            #[cfg(target_os = "macos")]
            tray_icon: None,
            #[cfg(target_os = "linux")]
            native: linux::NativeTray::new(),
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    #[must_use]
    pub fn icon(&self) -> IconId {
        self.icon
    }

    #[must_use]
    pub fn menu(&self) -> &MenuConfig {
        &self.menu
    }

    #[must_use]
    pub fn floating(&self) -> &FloatingWindow {
        &self.floating
    }

    /// Processes one pending update without blocking.
    ///
    /// Returns `true` if an update was processed.
    pub fn process_pending_update(&mut self) -> bool {
        match self.update_rx.try_recv() {
            Ok(update) => {
                self.handle_update(update);
                true
            }
            Err(crossbeam_channel::TryRecvError::Empty) => false,
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                warn!("tray update channel disconnected");
                false
            }
        }
    }

    /// Runs the tray loop until a shutdown update arrives or the engine
    /// drops its sender. `on_action` is called for every menu click.
    pub fn run_blocking<F>(&mut self, mut on_action: F)
    where
        F: FnMut(MenuAction),
    {
        info!("tray loop started");
        while !self.shutdown_requested {
            match self.next_update() {
                Ok(update) => {
                    self.handle_update(update);
                    while self.process_pending_update() {}
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("engine gone, leaving tray loop");
                    break;
                }
            }

            for action in self.poll_menu_actions() {
                on_action(action);
            }
        }
        self.shutdown();
        info!("tray loop finished");
    }

    /// Applies one update.
    fn handle_update(&mut self, update: TrayUpdate) {
        match update {
            TrayUpdate::SetTooltip(text) => {
                #[cfg(target_os = "macos")]
                if let Some(ref tray_icon) = self.tray_icon {
                    if let Err(e) = tray_icon.set_tooltip(Some(&text)) {
                        warn!(error = %e, "failed to set tooltip");
                    }
                }
                #[cfg(target_os = "linux")]
                self.native.update(|item| item.set_tooltip(text.clone()));
                self.tooltip = text;
            }
            TrayUpdate::SetIcon(icon) => {
                debug!(icon = %icon, "tray icon repaint");
                #[cfg(target_os = "macos")]
                if let Some(ref tray_icon) = self.tray_icon {
                    if let Err(e) = tray_icon.set_icon(load_icon(icon)) {
                        warn!(error = %e, "failed to set tray icon");
                    }
                }
                #[cfg(target_os = "linux")]
                self.native.update(|item| item.set_icon(icon));
                self.icon = icon;
            }
            TrayUpdate::Floating(view) => {
                self.floating.render(view);
                self.show_floating();
            }
            TrayUpdate::SetFloatingVisible(visible) => {
                if self.floating.is_enabled() != visible {
                    self.floating.toggle();
                }
                info!(visible, "floating chronometer");
                self.show_floating();
            }
            TrayUpdate::RebuildMenu(config) => {
                #[cfg(target_os = "macos")]
                if let Some(ref tray_icon) = self.tray_icon {
                    match build_native_menu(&config) {
                        Ok(menu) => tray_icon.set_menu(Some(Box::new(menu))),
                        Err(e) => warn!(error = %e, "failed to rebuild menu"),
                    }
                }
                #[cfg(target_os = "linux")]
                self.native.update(|item| item.set_menu(config.clone()));
                self.menu = config;
            }
            TrayUpdate::Shutdown => {
                info!("tray shutdown requested");
                self.shutdown_requested = true;
            }
        }
    }

    /// Renders the floating chronometer. On macOS and Linux it is shown as
    /// the status item title next to the icon.
    fn show_floating(&self) {
        let title = if self.floating.is_enabled() {
            self.floating.last_view().map(FloatingView::title)
        } else {
            None
        };

        #[cfg(target_os = "macos")]
        if let Some(ref tray_icon) = self.tray_icon {
            tray_icon.set_title(title.as_deref());
        }
        #[cfg(target_os = "linux")]
        self.native.update(|item| item.set_title(title.clone()));
        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        if let Some(title) = title {
            debug!(chronometer = %title, "floating chronometer");
        }
    }

    /// Tears down the native tray.
    pub fn shutdown(&mut self) {
        self.initialized = false;
        #[cfg(target_os = "macos")]
        {
            self.tray_icon = None;
        }
        #[cfg(target_os = "linux")]
        self.native.shutdown();
    }

    #[cfg(target_os = "macos")]
    fn next_update(&self) -> Result<TrayUpdate, RecvTimeoutError> {
        pump_run_loop(POLL_INTERVAL);
        self.update_rx.try_recv().map_err(|e| match e {
            crossbeam_channel::TryRecvError::Empty => RecvTimeoutError::Timeout,
            crossbeam_channel::TryRecvError::Disconnected => RecvTimeoutError::Disconnected,
        })
    }

    #[cfg(not(target_os = "macos"))]
    fn next_update(&self) -> Result<TrayUpdate, RecvTimeoutError> {
        self.update_rx.recv_timeout(POLL_INTERVAL)
    }

    #[cfg(target_os = "macos")]
    fn poll_menu_actions(&self) -> Vec<MenuAction> {
        tray_icon::menu::MenuEvent::receiver()
            .try_iter()
            .filter_map(|event| {
                self.event_handler
                    .handle_click(MenuItemId::parse(&event.id.0))
            })
            .collect()
    }

    #[cfg(target_os = "linux")]
    fn poll_menu_actions(&self) -> Vec<MenuAction> {
        self.native
            .poll_clicks()
            .into_iter()
            .filter_map(|id| self.event_handler.handle_click(id))
            .collect()
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn poll_menu_actions(&self) -> Vec<MenuAction> {
        Vec::new()
    }

    /// Creates the status item. Must be called on the main thread.
    ///
    /// # Errors
    ///
    /// Returns an error if not on the main thread or the tray icon cannot be
    /// created.
    #[cfg(target_os = "macos")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        use anyhow::Context;
        use tray_icon::TrayIconBuilder;

        if objc2::MainThreadMarker::new().is_none() {
            anyhow::bail!("the tray icon must be created on the main thread");
        }

        let menu = build_native_menu(&self.menu)?;
        let mut builder = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip(&self.tooltip);
        if let Some(icon) = load_icon(self.icon) {
            builder = builder.with_icon(icon);
        }
        let tray_icon = builder.build().context("failed to create tray icon")?;

        self.tray_icon = Some(tray_icon);
        self.initialized = true;
        self.show_floating();

        info!("tray icon initialized");
        Ok(())
    }

    /// Publishes the status item on the session bus.
    ///
    /// # Errors
    ///
    /// Returns an error if the status item thread cannot be started.
    #[cfg(target_os = "linux")]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        let item = self.status_item();
        self.native.start(item)?;
        self.initialized = true;
        self.show_floating();
        Ok(())
    }

    /// Builds a status item showing what the manager last applied.
    #[cfg(target_os = "linux")]
    fn status_item(&self) -> linux::StatusItem {
        self.native
            .status_item(self.tooltip.clone(), self.icon, self.menu.clone())
    }

    /// Marks the manager ready. There is no native tray on this platform.
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        info!("no native tray on this platform, control the timer with the CLI");
        self.initialized = true;
        Ok(())
    }
}

impl std::fmt::Debug for TrayIconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrayIconManager")
            .field("initialized", &self.initialized)
            .field("tooltip", &self.tooltip)
            .field("icon", &self.icon)
            .field("floating", &self.floating)
            .finish_non_exhaustive()
    }
}

/// RGBA pixels for `icon`: `icons/<name>.png` from the data directory, or
/// the built-in ring.
#[cfg(any(target_os = "macos", target_os = "linux"))]
fn icon_rgba(icon: IconId) -> (Vec<u8>, u32, u32) {
    let file = crate::sound::data_dir()
        .map(|dir| dir.join("icons").join(icon.file_name()))
        .and_then(|path| image::open(path).ok());
    match file {
        Some(img) => {
            let img = img.into_rgba8();
            let (width, height) = img.dimensions();
            (img.into_raw(), width, height)
        }
        None => (icon::render_rgba(icon, ICON_SIZE), ICON_SIZE, ICON_SIZE),
    }
}

// ============================================================================
// macOS backend
// ============================================================================

/// Builds a native menu from the configuration.
#[cfg(target_os = "macos")]
fn build_native_menu(config: &MenuConfig) -> anyhow::Result<tray_icon::menu::Menu> {
    use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};

    let menu = Menu::new();
    for entry in config.entries() {
        match entry {
            Some(item) => {
                menu.append(&MenuItem::with_id(item.id.as_str(), &item.text, item.enabled, None))?;
            }
            None => menu.append(&PredefinedMenuItem::separator())?,
        }
    }
    Ok(menu)
}

/// Loads the tray icon image for `icon`.
#[cfg(target_os = "macos")]
fn load_icon(icon: IconId) -> Option<tray_icon::Icon> {
    let (rgba, width, height) = icon_rgba(icon);
    tray_icon::Icon::from_rgba(rgba, width, height)
        .map_err(|e| warn!(icon = %icon, error = %e, "unusable icon image"))
        .ok()
}

/// Lets AppKit process pending events for up to `timeout`.
#[cfg(target_os = "macos")]
fn pump_run_loop(timeout: Duration) {
    use objc2_foundation::{NSDate, NSRunLoop};

    // SAFETY: only called from the tray loop on the thread that owns the
    // status item; the run loop belongs to that thread. `runUntilDate` is
    // an unsafe binding in objc2-foundation 0.3.
    unsafe {
        let until = NSDate::dateWithTimeIntervalSinceNow(timeout.as_secs_f64());
        NSRunLoop::currentRunLoop().runUntilDate(&until);
    }
}

// ============================================================================
// Tests
// ============================================================================
