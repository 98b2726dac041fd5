//! Icon selection and tooltip text for the tray.
//!
//! Everything here is a pure function of [`TimerState`]. The tray backend
//! decides how an [`IconId`] becomes pixels; [`render_rgba`] provides a
//! built-in progress ring for platforms without icon files.

use std::fmt;

use crate::types::TimerState;

// ============================================================================
// Constants
// ============================================================================

/// Tooltip shown before the timer has ever ticked.
pub const IDLE_TOOLTIP: &str = "Pomodoro Timer";

/// Tier thresholds as (strictly-greater-than percent, tier).
const TIERS: [(u32, u8); 10] = [
    (90, 100),
    (80, 90),
    (70, 80),
    (60, 70),
    (50, 60),
    (40, 50),
    (30, 40),
    (20, 30),
    (10, 20),
    (5, 10),
];

// ============================================================================
// IconId
// ============================================================================

/// Identifies which tray icon should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    /// Timer not running
    Default,
    /// Timer paused
    Paused,
    /// Running, bucketed by percent remaining: 100, 90, ..., 10, 0
    Tier(u8),
}

impl IconId {
    /// Returns the icon file name looked up in the data directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            IconId::Default => "default.png".to_string(),
            IconId::Paused => "pause.png".to_string(),
            IconId::Tier(tier) => format!("{tier}.png"),
        }
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconId::Default => write!(f, "default"),
            IconId::Paused => write!(f, "paused"),
            IconId::Tier(tier) => write!(f, "tier-{tier}"),
        }
    }
}

// ============================================================================
// Derivation
// ============================================================================

/// Selects the tray icon for `state`.
///
/// Idle shows the default icon and paused shows the pause icon regardless of
/// progress. A running timer is bucketed by percent remaining with strict
/// greater-than comparisons: 91 maps to tier 100, 90 to tier 90, 0 to tier 0.
#[must_use]
pub fn select_icon(state: &TimerState) -> IconId {
    if !state.is_active() {
        return IconId::Default;
    }
    if state.is_paused() {
        return IconId::Paused;
    }
    tier_for_percent(state.percent_remaining())
}

/// Buckets a percentage into an icon tier.
#[must_use]
pub fn tier_for_percent(percent: u32) -> IconId {
    TIERS
        .iter()
        .find(|(threshold, _)| percent > *threshold)
        .map_or(IconId::Tier(0), |(_, tier)| IconId::Tier(*tier))
}

/// Formats seconds as `MM:SS`. Minutes are not wrapped at 60.
#[must_use]
pub fn format_time(remaining_seconds: u32) -> String {
    format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

/// Builds the tray tooltip, e.g. `"Pomodoro - 24:59 remaining"`.
#[must_use]
pub fn tooltip(state: &TimerState) -> String {
    format!(
        "{} - {} remaining",
        state.mode.label(),
        format_time(state.remaining_seconds)
    )
}

// ============================================================================
// IconManager
// ============================================================================

/// Remembers the last icon pushed to the tray so unchanged icons are not
/// repainted every second.
#[derive(Debug)]
pub struct IconManager {
    current: IconId,
}

impl Default for IconManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IconManager {
    /// Starts with the default icon, which the tray shows at creation.
    pub fn new() -> Self {
        Self {
            current: IconId::Default,
        }
    }

    /// Returns the icon currently displayed.
    #[must_use]
    pub fn current(&self) -> IconId {
        self.current
    }

    /// Records `icon` as displayed. Returns true if it differs from the
    /// previous one and the tray must be repainted.
    pub fn update(&mut self, icon: IconId) -> bool {
        if self.current == icon {
            return false;
        }
        self.current = icon;
        true
    }
}

// ============================================================================
// Built-in rendering
// ============================================================================

/// Renders `icon` as a `size`x`size` RGBA progress ring.
///
/// The filled arc follows the tier, paused draws two bars and the default
/// icon is a full ring.
#[must_use]
pub fn render_rgba(icon: IconId, size: u32) -> Vec<u8> {
    let mut rgba = vec![0u8; (size * size * 4) as usize];
    let center = size as f32 / 2.0;
    let outer = center - 1.0;
    let inner = outer - (size as f32 / 6.0).max(1.5);
    let filled = match icon {
        IconId::Default => 1.0,
        IconId::Paused => 0.0,
        IconId::Tier(tier) => f32::from(tier) / 100.0,
    };

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            let idx = ((y * size + x) * 4) as usize;

            let shade = if icon == IconId::Paused {
                let bar = dx.abs() > size as f32 / 10.0 && dx.abs() < size as f32 / 4.0;
                (bar && dy.abs() < size as f32 / 4.0).then_some(255)
            } else if dist <= outer && dist >= inner {
                let turn = dx.atan2(-dy).rem_euclid(std::f32::consts::TAU) / std::f32::consts::TAU;
                Some(if turn <= filled { 255 } else { 70 })
            } else {
                None
            };

            if let Some(value) = shade {
                rgba[idx..idx + 4].copy_from_slice(&[value, value, value, 255]);
            }
        }
    }

    rgba
}

// ============================================================================
// Tests
// ============================================================================
