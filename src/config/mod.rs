//! Config store for the durable timer settings.
//!
//! Settings live in a flat `key=value` text file, one entry per line:
//!
//! ```text
//! pomodoro_duration=25
//! break_duration=5
//! long_break_duration=15
//! pomodoros_before_long=4
//! volume_level=100
//! notification_delay=10
//! ```
//!
//! Durations are whole minutes on disk and seconds in memory. Lines starting
//! with `#`, blank lines, unknown keys and lines that are not `key=integer`
//! are skipped. A missing file means defaults.

mod error;
mod form;

pub use error::ConfigError;
pub use form::{SettingsForm, NOTIFICATION_DELAY_RANGE, VOLUME_RANGE};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::types::TimerSettings;

/// File name of the config file inside the user's config directory.
pub const CONFIG_FILE_NAME: &str = "pomotray.cfg";

const KEY_POMODORO: &str = "pomodoro_duration";
const KEY_BREAK: &str = "break_duration";
const KEY_LONG_BREAK: &str = "long_break_duration";
const KEY_CYCLES: &str = "pomodoros_before_long";
const KEY_VOLUME: &str = "volume_level";
const KEY_DELAY: &str = "notification_delay";

// ============================================================================
// ConfigStore
// ============================================================================

/// Loads and saves [`TimerSettings`] at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the default location (`<config dir>/pomotray.cfg`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config directory.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join(CONFIG_FILE_NAME)))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings, falling back to defaults.
    ///
    /// Never fails: a missing file yields defaults, an unreadable file is
    /// logged and yields defaults, and bad lines are skipped.
    pub fn load(&self) -> TimerSettings {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!(path = %self.path.display(), "loading settings");
                parse_settings(&contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no config file, using defaults");
                TimerSettings::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read config file, using defaults");
                TimerSettings::default()
            }
        }
    }

    /// Writes all six settings, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the directory or file cannot be written.
    pub fn save(&self, settings: &TimerSettings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, format_settings(settings)).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

// ============================================================================
// Parsing / formatting
// ============================================================================

/// Parses the flat file format on top of the defaults.
pub fn parse_settings(contents: &str) -> TimerSettings {
    let mut settings = TimerSettings::default();

    for (index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = parse_line(trimmed) else {
            debug!(line = index + 1, "skipping malformed config line");
            continue;
        };

        match key {
            KEY_POMODORO => settings.focus_seconds = value.saturating_mul(60),
            KEY_BREAK => settings.short_break_seconds = value.saturating_mul(60),
            KEY_LONG_BREAK => settings.long_break_seconds = value.saturating_mul(60),
            KEY_CYCLES => settings.cycles_before_long_break = value,
            KEY_VOLUME => settings.volume_percent = value.min(VOLUME_RANGE.1),
            KEY_DELAY => settings.notification_delay_seconds = value,
            other => debug!(key = other, "ignoring unknown config key"),
        }
    }

    settings
}

fn parse_line(line: &str) -> Option<(&str, u32)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim().parse::<u32>().ok()?;
    Some((key, value))
}

/// Formats settings in the flat file format.
pub fn format_settings(settings: &TimerSettings) -> String {
    format!(
        "{KEY_POMODORO}={}\n{KEY_BREAK}={}\n{KEY_LONG_BREAK}={}\n{KEY_CYCLES}={}\n{KEY_VOLUME}={}\n{KEY_DELAY}={}\n",
        settings.focus_seconds / 60,
        settings.short_break_seconds / 60,
        settings.long_break_seconds / 60,
        settings.cycles_before_long_break,
        settings.volume_percent,
        settings.notification_delay_seconds,
    )
}

// ============================================================================
// Tests
// ============================================================================
