//! Display utilities for the tray timer CLI.
//!
//! This module provides formatted output for:
//! - Command results
//! - Error messages
//! - Status and settings display
//! - The stop confirmation prompt

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::menubar::format_time;
use crate::types::{IpcResponse, Mode, ResponseData, TimerSettings};

/// Question asked before stopping the timer.
pub const STOP_CONFIRMATION: &str = "Are you sure you want to stop the timer?";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the daemon's message followed by the remaining time.
    pub fn show_result(response: &IpcResponse) {
        for line in Self::result_lines(response) {
            println!("{}", line);
        }
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        for line in Self::status_lines(response.data.as_ref()) {
            println!("{}", line);
        }
    }

    /// Shows settings and where they are stored.
    pub fn show_settings(settings: &TimerSettings, path: Option<&Path>) {
        for line in Self::settings_lines(settings) {
            println!("{}", line);
        }
        if let Some(path) = path {
            println!("Config file: {}", path.display());
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Asks a yes/no question on stdin. Anything but `y`/`yes` is no.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    pub fn confirm(question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{} [y/N] ", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }

    fn result_lines(response: &IpcResponse) -> Vec<String> {
        let mut lines = Vec::new();
        if !response.message.is_empty() {
            lines.push(response.message.clone());
        }
        if let Some(data) = &response.data {
            if let (Some(mode), Some(remaining)) = (mode_of(data), data.remaining_seconds) {
                lines.push(format!("  {} - {} remaining", mode.label(), format_time(remaining)));
            }
        }
        lines
    }

    fn status_lines(data: Option<&ResponseData>) -> Vec<String> {
        let mut lines = vec![
            "Pomodoro Timer status".to_string(),
            "─────────────────────".to_string(),
        ];

        let Some(data) = data else {
            lines.push("The daemon sent no status".to_string());
            return lines;
        };

        let activity = data.activity.as_deref().unwrap_or("unknown");
        lines.push(format!(
            "State:      {}",
            match activity {
                "idle" => "Stopped",
                "running" => "Running",
                "paused" => "Paused",
                other => other,
            }
        ));
        if let Some(mode) = mode_of(data) {
            lines.push(format!("Interval:   {}", mode.label()));
        }
        if let Some(remaining) = data.remaining_seconds {
            lines.push(format!("Remaining:  {}", format_time(remaining)));
        }
        if let Some(count) = data.focus_count {
            let cycles = data
                .settings
                .as_ref()
                .map(|s| s.cycles_before_long_break.to_string())
                .unwrap_or_else(|| "?".to_string());
            lines.push(format!("Pomodoros:  {}/{} before long break", count, cycles));
        }
        if let Some(visible) = data.floating_visible {
            lines.push(format!(
                "Chronometer: {}",
                if visible { "shown" } else { "hidden" }
            ));
        }
        lines
    }

    fn settings_lines(settings: &TimerSettings) -> Vec<String> {
        vec![
            format!("Pomodoro duration:      {} min", settings.focus_seconds / 60),
            format!("Break duration:         {} min", settings.short_break_seconds / 60),
            format!("Long break duration:    {} min", settings.long_break_seconds / 60),
            format!("Pomodoros before long:  {}", settings.cycles_before_long_break),
            format!("Volume:                 {}", settings.volume_percent),
            format!("Notification delay:     {} s", settings.notification_delay_seconds),
        ]
    }
}

fn mode_of(data: &ResponseData) -> Option<Mode> {
    match data.mode.as_deref()? {
        "focus" => Some(Mode::Focus),
        "short_break" => Some(Mode::ShortBreak),
        "long_break" => Some(Mode::LongBreak),
        _ => None,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ============================================================================
// Tests
// ============================================================================
