//! Command definitions for the tray timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::SettingsParams;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro tray timer
#[derive(Parser, Debug)]
#[command(
    name = "pomotray",
    version,
    about = "Pomodoro timer living in the system tray",
    long_about = "A Pomodoro timer that lives in the system tray.\n\
                  Run `pomotray daemon` once, then control it from the tray menu or with the \
                  commands below.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the tray daemon in the foreground
    Daemon {
        /// Show the floating chronometer from the start
        #[arg(long)]
        floating: bool,
    },

    /// Start a pomodoro from idle
    Start,

    /// Start, pause or resume, like the play/pause button
    Toggle,

    /// Pause the running timer
    Pause,

    /// Resume the paused timer
    Resume,

    /// Stop the timer and reset the current interval
    Stop {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show current timer status
    Status,

    /// Show or hide the floating chronometer
    Floating,

    /// Change settings on the running daemon and save them
    Configure(ConfigureArgs),

    /// Print the saved settings without contacting the daemon
    Config,

    /// Quit the daemon
    Quit,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Configure Command Arguments
// ============================================================================

/// Arguments for the configure command. Omitted values are left unchanged.
///
/// Durations and cycles are checked by the daemon so that zero is reported
/// the same way the configuration dialog reports it.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigureArgs {
    /// Pomodoro duration in minutes
    #[arg(short, long, value_name = "MINUTES")]
    pub pomodoro: Option<u32>,

    /// Short break duration in minutes
    #[arg(short = 'b', long = "break", value_name = "MINUTES")]
    pub break_time: Option<u32>,

    /// Long break duration in minutes
    #[arg(short, long, value_name = "MINUTES")]
    pub long_break: Option<u32>,

    /// Pomodoros before a long break
    #[arg(short, long)]
    pub cycles: Option<u32>,

    /// Chime volume (0 disables the chime)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub volume: Option<u32>,

    /// Notification timeout in seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(2..=60))]
    pub delay: Option<u32>,
}

impl ConfigureArgs {
    /// Converts the arguments into request parameters.
    pub fn to_params(&self) -> SettingsParams {
        SettingsParams {
            pomodoro_minutes: self.pomodoro,
            break_minutes: self.break_time,
            long_break_minutes: self.long_break,
            pomodoros_before_long: self.cycles,
            volume_level: self.volume,
            notification_delay: self.delay,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
