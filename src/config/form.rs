//! Configuration form model.
//!
//! Holds what the configuration dialog edits: durations in whole minutes,
//! the long break cadence, and the two slider values. `validate` is the
//! Save button: it either yields new settings or rejects the form without
//! touching anything.

use crate::types::{SettingsParams, TimerSettings};

use super::error::ConfigError;

/// Volume slider range
pub const VOLUME_RANGE: (u32, u32) = (0, 100);

/// Notification delay slider range, in seconds
pub const NOTIFICATION_DELAY_RANGE: (u32, u32) = (2, 60);

/// Values as entered in the configuration dialog.
///
/// The numeric entries are signed so that negative input reaches
/// validation instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    /// Pomodoro duration in minutes
    pub pomodoro_minutes: i64,
    /// Short break duration in minutes
    pub break_minutes: i64,
    /// Long break duration in minutes
    pub long_break_minutes: i64,
    /// Pomodoros before a long break
    pub pomodoros_before_long: i64,
    /// Volume slider value
    pub volume_level: i64,
    /// Notification delay slider value, in seconds
    pub notification_delay: i64,
}

impl From<&TimerSettings> for SettingsForm {
    fn from(settings: &TimerSettings) -> Self {
        Self {
            pomodoro_minutes: i64::from(settings.focus_seconds / 60),
            break_minutes: i64::from(settings.short_break_seconds / 60),
            long_break_minutes: i64::from(settings.long_break_seconds / 60),
            pomodoros_before_long: i64::from(settings.cycles_before_long_break),
            volume_level: i64::from(settings.volume_percent),
            notification_delay: i64::from(settings.notification_delay_seconds),
        }
    }
}

impl SettingsForm {
    /// Overwrites the fields present in `params`.
    pub fn apply(&mut self, params: &SettingsParams) {
        if let Some(v) = params.pomodoro_minutes {
            self.pomodoro_minutes = i64::from(v);
        }
        if let Some(v) = params.break_minutes {
            self.break_minutes = i64::from(v);
        }
        if let Some(v) = params.long_break_minutes {
            self.long_break_minutes = i64::from(v);
        }
        if let Some(v) = params.pomodoros_before_long {
            self.pomodoros_before_long = i64::from(v);
        }
        if let Some(v) = params.volume_level {
            self.volume_level = i64::from(v);
        }
        if let Some(v) = params.notification_delay {
            self.notification_delay = i64::from(v);
        }
    }

    /// Validates the form and converts it into settings.
    ///
    /// Durations and the cycle count must be at least 1. Volume and delay
    /// are clamped to their slider ranges instead of being rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEntry` naming the first bad field.
    pub fn validate(&self) -> Result<TimerSettings, ConfigError> {
        let pomodoro = positive(self.pomodoro_minutes, "pomodoro duration")?;
        let short_break = positive(self.break_minutes, "break duration")?;
        let long_break = positive(self.long_break_minutes, "long break duration")?;
        let cycles = positive(self.pomodoros_before_long, "pomodoros before long break")?;

        Ok(TimerSettings {
            focus_seconds: pomodoro.saturating_mul(60),
            short_break_seconds: short_break.saturating_mul(60),
            long_break_seconds: long_break.saturating_mul(60),
            cycles_before_long_break: cycles,
            volume_percent: clamp(self.volume_level, VOLUME_RANGE),
            notification_delay_seconds: clamp(self.notification_delay, NOTIFICATION_DELAY_RANGE),
        })
    }
}

fn positive(value: i64, field: &'static str) -> Result<u32, ConfigError> {
    if value < 1 {
        return Err(ConfigError::InvalidEntry { field });
    }
    u32::try_from(value).map_err(|_| ConfigError::InvalidEntry { field })
}

fn clamp(value: i64, (min, max): (u32, u32)) -> u32 {
    value.clamp(i64::from(min), i64::from(max)) as u32
}
