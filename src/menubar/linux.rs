//! Linux tray backend.
//!
//! Publishes a StatusNotifierItem over D-Bus with `ksni`, so no GTK event
//! loop is needed. [`StatusItem`] holds what the panel shows; the manager
//! changes it through the service handle. Menu callbacks run on the D-Bus
//! thread and only push item ids into a channel the manager drains.

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use ksni::menu::StandardItem;
use tracing::{debug, info, warn};

use super::event::MenuItemId;
use super::icon::{IconId, IDLE_TOOLTIP};
use super::menu::MenuConfig;

/// StatusNotifierItem id
const ITEM_ID: &str = "pomotray";

// ============================================================================
// StatusItem
// ============================================================================

/// The state rendered by the panel.
pub struct StatusItem {
    tooltip: String,
    icon: IconId,
    pixmap: ksni::Icon,
    title: Option<String>,
    menu: MenuConfig,
    clicks: Sender<MenuItemId>,
}

impl StatusItem {
    fn new(tooltip: String, icon: IconId, menu: MenuConfig, clicks: Sender<MenuItemId>) -> Self {
        Self {
            tooltip,
            icon,
            pixmap: pixmap(icon),
            title: None,
            menu,
            clicks,
        }
    }

    pub fn set_tooltip(&mut self, tooltip: String) {
        self.tooltip = tooltip;
    }

    pub fn set_icon(&mut self, icon: IconId) {
        if self.icon != icon {
            self.icon = icon;
            self.pixmap = pixmap(icon);
        }
    }

    /// Sets the text shown next to the icon; `None` shows the app name.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn set_menu(&mut self, menu: MenuConfig) {
        self.menu = menu;
    }

    fn click(&self, id: MenuItemId) {
        if self.clicks.send(id).is_err() {
            debug!(item = id.as_str(), "tray manager gone, click dropped");
        }
    }
}

impl ksni::Tray for StatusItem {
    fn id(&self) -> String {
        ITEM_ID.to_string()
    }

    fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| IDLE_TOOLTIP.to_string())
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        vec![self.pixmap.clone()]
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            title: self.tooltip.clone(),
            ..Default::default()
        }
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        self.menu
            .entries()
            .into_iter()
            .map(|entry| match entry {
                Some(item) => {
                    let id = item.id;
                    StandardItem {
                        label: item.text.clone(),
                        enabled: item.enabled,
                        activate: Box::new(move |tray: &mut Self| tray.click(id)),
                        ..Default::default()
                    }
                    .into()
                }
                None => ksni::MenuItem::Separator,
            })
            .collect()
    }
}

/// Builds the D-Bus pixmap for `icon`.
fn pixmap(icon: IconId) -> ksni::Icon {
    let (rgba, width, height) = super::icon_rgba(icon);
    ksni::Icon {
        width: width as i32,
        height: height as i32,
        data: argb_from_rgba(&rgba),
    }
}

/// StatusNotifierItem pixmaps are ARGB32 in network byte order.
fn argb_from_rgba(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[3], px[0], px[1], px[2]])
        .collect()
}

// ============================================================================
// NativeTray
// ============================================================================

/// Owns the running D-Bus service and the click channel.
pub struct NativeTray {
    handle: Option<ksni::Handle<StatusItem>>,
    clicks_tx: Sender<MenuItemId>,
    clicks_rx: Receiver<MenuItemId>,
}

impl NativeTray {
    pub fn new() -> Self {
        let (clicks_tx, clicks_rx) = crossbeam_channel::unbounded();
        Self {
            handle: None,
            clicks_tx,
            clicks_rx,
        }
    }

    /// Creates an item whose menu clicks arrive in [`poll_clicks`](Self::poll_clicks).
    pub fn status_item(&self, tooltip: String, icon: IconId, menu: MenuConfig) -> StatusItem {
        StatusItem::new(tooltip, icon, menu, self.clicks_tx.clone())
    }

    /// Registers `item` on the session bus from a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the service thread cannot be spawned. A missing
    /// session bus is only logged by that thread.
    pub fn start(&mut self, item: StatusItem) -> anyhow::Result<()> {
        let service = ksni::TrayService::new(item);
        let handle = service.handle();
        std::thread::Builder::new()
            .name("status-item".to_string())
            .spawn(move || {
                if let Err(e) = service.run() {
                    warn!(error = ?e, "status item unavailable");
                }
            })
            .context("failed to spawn status item thread")?;

        self.handle = Some(handle);
        info!("status item registered");
        Ok(())
    }

    /// Applies `f` to the published item and notifies the panel.
    pub fn update<F>(&self, f: F)
    where
        F: Fn(&mut StatusItem),
    {
        if let Some(handle) = &self.handle {
            handle.update(f);
        }
    }

    /// Drains clicks received since the last call.
    pub fn poll_clicks(&self) -> Vec<MenuItemId> {
        self.clicks_rx.try_iter().collect()
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown();
        }
    }
}

impl Default for NativeTray {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
