//! Core data types for the tray timer.
//!
//! This module defines the data structures used for:
//! - Timer mode and activity (the two axes of the state machine)
//! - Durable settings loaded from the config store
//! - The timer state owned by the engine
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

// ============================================================================
// Mode
// ============================================================================

/// The interval the timer is currently counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Focused work interval
    Focus,
    /// Short rest between focus intervals
    ShortBreak,
    /// Long rest after a full set of focus intervals
    LongBreak,
}

impl Mode {
    /// Returns the wire representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    /// Returns the label shown on the tooltip and floating window.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Pomodoro",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Returns true for either kind of break.
    pub fn is_break(&self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Focus
    }
}

// ============================================================================
// Activity
// ============================================================================

/// Whether a tick source is driving the countdown.
///
/// `Idle` only ever pairs with the nominal duration of the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Not started, or stopped
    Idle,
    /// Counting down once per second
    Running,
    /// Started, tick source suspended
    Paused,
}

impl Activity {
    /// Returns the wire representation of the activity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Idle => "idle",
            Activity::Running => "running",
            Activity::Paused => "paused",
        }
    }
}

impl Default for Activity {
    fn default() -> Self {
        Activity::Idle
    }
}

// ============================================================================
// TimerSettings
// ============================================================================

/// Default focus duration in minutes
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

/// Default short break duration in minutes
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;

/// Default long break duration in minutes
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;

/// Default number of focus intervals before a long break
pub const DEFAULT_CYCLES_BEFORE_LONG_BREAK: u32 = 4;

/// Default chime volume in percent
pub const DEFAULT_VOLUME_PERCENT: u32 = 100;

/// Default desktop notification timeout in seconds
pub const DEFAULT_NOTIFICATION_DELAY_SECONDS: u32 = 10;

/// Durable settings. Durations are stored in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Focus interval length in seconds
    pub focus_seconds: u32,
    /// Short break length in seconds
    pub short_break_seconds: u32,
    /// Long break length in seconds
    pub long_break_seconds: u32,
    /// Completed focus intervals that trigger a long break
    pub cycles_before_long_break: u32,
    /// Chime volume, 0-100 (0 disables the chime)
    pub volume_percent: u32,
    /// How long desktop notifications stay on screen, in seconds
    pub notification_delay_seconds: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_seconds: DEFAULT_FOCUS_MINUTES * 60,
            short_break_seconds: DEFAULT_SHORT_BREAK_MINUTES * 60,
            long_break_seconds: DEFAULT_LONG_BREAK_MINUTES * 60,
            cycles_before_long_break: DEFAULT_CYCLES_BEFORE_LONG_BREAK,
            volume_percent: DEFAULT_VOLUME_PERCENT,
            notification_delay_seconds: DEFAULT_NOTIFICATION_DELAY_SECONDS,
        }
    }
}

impl TimerSettings {
    /// Returns a copy with the focus duration set in minutes.
    pub fn with_focus_minutes(mut self, minutes: u32) -> Self {
        self.focus_seconds = minutes * 60;
        self
    }

    /// Returns a copy with the short break duration set in minutes.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_seconds = minutes * 60;
        self
    }

    /// Returns a copy with the long break duration set in minutes.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_seconds = minutes * 60;
        self
    }

    /// Returns a copy with the long break cadence set.
    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles_before_long_break = cycles;
        self
    }

    /// Returns a copy with the chime volume set.
    pub fn with_volume(mut self, volume_percent: u32) -> Self {
        self.volume_percent = volume_percent;
        self
    }

    /// Returns the nominal duration of `mode` in seconds.
    pub fn duration_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus_seconds,
            Mode::ShortBreak => self.short_break_seconds,
            Mode::LongBreak => self.long_break_seconds,
        }
    }

    /// Returns the chime volume as a 0.0-1.0 gain.
    pub fn volume_gain(&self) -> f32 {
        self.volume_percent.min(100) as f32 / 100.0
    }

    /// Returns the notification timeout in milliseconds.
    pub fn notification_timeout_ms(&self) -> u32 {
        self.notification_delay_seconds.saturating_mul(1000)
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The state owned by the timer engine.
///
/// Only the engine mutates this; surfaces read it through the engine's
/// accessors and submit commands through its entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Interval being counted
    pub mode: Mode,
    /// Whether the countdown is idle, running or paused
    pub activity: Activity,
    /// Seconds left in the current interval
    pub remaining_seconds: u32,
    /// Focus intervals completed since the last long break
    pub focus_count: u32,
    /// Durable settings
    pub settings: TimerSettings,
}

impl TimerState {
    /// Creates an idle Focus state with the nominal focus duration.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            mode: Mode::Focus,
            activity: Activity::Idle,
            remaining_seconds: settings.focus_seconds,
            focus_count: 0,
            settings,
        }
    }

    /// Returns the nominal duration of the current mode.
    pub fn current_duration(&self) -> u32 {
        self.settings.duration_for(self.mode)
    }

    /// Switches to `mode` with its full nominal duration.
    pub fn enter_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.remaining_seconds = self.settings.duration_for(mode);
    }

    /// Resets the remaining time to the nominal duration of the current mode.
    pub fn reset_remaining(&mut self) {
        self.remaining_seconds = self.current_duration();
    }

    /// Decrements the countdown by one second, floored at zero.
    ///
    /// Returns true if the interval has completed.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Returns true while the tick source is decrementing the countdown.
    pub fn is_running(&self) -> bool {
        self.activity == Activity::Running
    }

    /// Returns true if the timer was started and is suspended.
    pub fn is_paused(&self) -> bool {
        self.activity == Activity::Paused
    }

    /// Returns true if the timer is running or paused.
    pub fn is_active(&self) -> bool {
        self.activity != Activity::Idle
    }

    /// Returns the remaining time as a percentage of the nominal duration.
    pub fn percent_remaining(&self) -> u32 {
        let duration = self.current_duration();
        if duration == 0 {
            return 0;
        }
        (u64::from(self.remaining_seconds) * 100 / u64::from(duration)) as u32
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// Settings carried by a configure request, in the units the user edits.
///
/// Fields left out keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsParams {
    /// Focus duration in minutes
    #[serde(rename = "pomodoroMinutes", skip_serializing_if = "Option::is_none")]
    pub pomodoro_minutes: Option<u32>,
    /// Short break duration in minutes
    #[serde(rename = "breakMinutes", skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
    /// Long break duration in minutes
    #[serde(rename = "longBreakMinutes", skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<u32>,
    /// Focus intervals before a long break
    #[serde(rename = "pomodorosBeforeLong", skip_serializing_if = "Option::is_none")]
    pub pomodoros_before_long: Option<u32>,
    /// Chime volume, 0-100
    #[serde(rename = "volumeLevel", skip_serializing_if = "Option::is_none")]
    pub volume_level: Option<u32>,
    /// Notification timeout in seconds
    #[serde(rename = "notificationDelay", skip_serializing_if = "Option::is_none")]
    pub notification_delay: Option<u32>,
}

impl SettingsParams {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Start a focus interval from idle
    Start,
    /// Start, pause or resume depending on the current activity
    Toggle,
    /// Pause the running timer
    Pause,
    /// Resume the paused timer
    Resume,
    /// Stop the timer and reset the current mode's countdown
    Stop,
    /// Query the current status
    Status,
    /// Show or hide the floating chronometer
    ToggleFloating,
    /// Replace the durable settings
    Configure {
        /// New settings
        #[serde(flatten)]
        settings: SettingsParams,
    },
    /// Shut the daemon down
    Quit,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Current mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Current activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Focus intervals since the last long break
    #[serde(rename = "focusCount", skip_serializing_if = "Option::is_none")]
    pub focus_count: Option<u32>,
    /// Whether the floating chronometer is shown
    #[serde(rename = "floatingVisible", skip_serializing_if = "Option::is_none")]
    pub floating_visible: Option<bool>,
    /// Effective settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<TimerSettings>,
    /// Config file the daemon saves settings to
    #[serde(rename = "configPath", skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

impl ResponseData {
    /// Creates response data from timer state.
    pub fn from_timer_state(state: &TimerState) -> Self {
        Self {
            mode: Some(state.mode.as_str().to_string()),
            activity: Some(state.activity.as_str().to_string()),
            remaining_seconds: Some(state.remaining_seconds),
            focus_count: Some(state.focus_count),
            floating_visible: None,
            settings: Some(state.settings.clone()),
            config_path: None,
        }
    }

    /// Attaches the floating window visibility.
    pub fn with_floating(mut self, visible: bool) -> Self {
        self.floating_visible = Some(visible);
        self
    }

    /// Attaches the daemon's config file location.
    pub fn with_config_path(mut self, path: &std::path::Path) -> Self {
        self.config_path = Some(path.display().to_string());
        self
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true for an error response.
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Mode / Activity Tests
    // ------------------------------------------------------------------------

    mod mode_tests {
        use super::*;

        #[test]
        fn test_default_is_focus() {
            assert_eq!(Mode::default(), Mode::Focus);
            assert_eq!(Activity::default(), Activity::Idle);
        }

        #[test]
        fn test_labels() {
            assert_eq!(Mode::Focus.label(), "Pomodoro");
            assert_eq!(Mode::ShortBreak.label(), "Short Break");
            assert_eq!(Mode::LongBreak.label(), "Long Break");
        }

        #[test]
        fn test_is_break() {
            assert!(!Mode::Focus.is_break());
            assert!(Mode::ShortBreak.is_break());
            assert!(Mode::LongBreak.is_break());
        }

        #[test]
        fn test_serialize() {
            assert_eq!(
                serde_json::to_string(&Mode::ShortBreak).unwrap(),
                "\"short_break\""
            );
            assert_eq!(
                serde_json::to_string(&Activity::Paused).unwrap(),
                "\"paused\""
            );
        }
    }

    // ------------------------------------------------------------------------
    // TimerSettings Tests
    // ------------------------------------------------------------------------

    mod settings_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let settings = TimerSettings::default();
            assert_eq!(settings.focus_seconds, 1500);
            assert_eq!(settings.short_break_seconds, 300);
            assert_eq!(settings.long_break_seconds, 900);
            assert_eq!(settings.cycles_before_long_break, 4);
            assert_eq!(settings.volume_percent, 100);
            assert_eq!(settings.notification_delay_seconds, 10);
        }

        #[test]
        fn test_builder_pattern() {
            let settings = TimerSettings::default()
                .with_focus_minutes(50)
                .with_short_break_minutes(10)
                .with_long_break_minutes(30)
                .with_cycles(2)
                .with_volume(0);
            assert_eq!(settings.focus_seconds, 3000);
            assert_eq!(settings.short_break_seconds, 600);
            assert_eq!(settings.long_break_seconds, 1800);
            assert_eq!(settings.cycles_before_long_break, 2);
            assert_eq!(settings.volume_percent, 0);
        }

        #[test]
        fn test_duration_for() {
            let settings = TimerSettings::default();
            assert_eq!(settings.duration_for(Mode::Focus), 1500);
            assert_eq!(settings.duration_for(Mode::ShortBreak), 300);
            assert_eq!(settings.duration_for(Mode::LongBreak), 900);
        }

        #[test]
        fn test_volume_gain() {
            assert_eq!(TimerSettings::default().volume_gain(), 1.0);
            assert_eq!(TimerSettings::default().with_volume(50).volume_gain(), 0.5);
            assert_eq!(TimerSettings::default().with_volume(0).volume_gain(), 0.0);
        }

        #[test]
        fn test_notification_timeout_ms() {
            assert_eq!(TimerSettings::default().notification_timeout_ms(), 10_000);
        }
    }

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_new_state() {
            let state = TimerState::new(TimerSettings::default());
            assert_eq!(state.mode, Mode::Focus);
            assert_eq!(state.activity, Activity::Idle);
            assert_eq!(state.remaining_seconds, 1500);
            assert_eq!(state.focus_count, 0);
            assert!(!state.is_active());
        }

        #[test]
        fn test_enter_mode() {
            let mut state = TimerState::new(TimerSettings::default());
            state.enter_mode(Mode::LongBreak);
            assert_eq!(state.mode, Mode::LongBreak);
            assert_eq!(state.remaining_seconds, 900);
        }

        #[test]
        fn test_reset_remaining_uses_current_mode() {
            let mut state = TimerState::new(TimerSettings::default());
            state.enter_mode(Mode::ShortBreak);
            state.remaining_seconds = 12;
            state.reset_remaining();
            assert_eq!(state.remaining_seconds, 300);
        }

        #[test]
        fn test_tick() {
            let mut state = TimerState::new(TimerSettings::default());
            state.remaining_seconds = 2;
            assert!(!state.tick());
            assert_eq!(state.remaining_seconds, 1);
            assert!(state.tick());
            assert_eq!(state.remaining_seconds, 0);
        }

        #[test]
        fn test_tick_at_zero_never_goes_negative() {
            let mut state = TimerState::new(TimerSettings::default());
            state.remaining_seconds = 0;
            assert!(state.tick());
            assert_eq!(state.remaining_seconds, 0);
        }

        #[test]
        fn test_activity_predicates() {
            let mut state = TimerState::new(TimerSettings::default());
            state.activity = Activity::Running;
            assert!(state.is_running());
            assert!(!state.is_paused());
            assert!(state.is_active());

            state.activity = Activity::Paused;
            assert!(!state.is_running());
            assert!(state.is_paused());
            assert!(state.is_active());
        }

        #[test]
        fn test_percent_remaining() {
            let mut state = TimerState::new(TimerSettings::default());
            assert_eq!(state.percent_remaining(), 100);
            state.remaining_seconds = 750;
            assert_eq!(state.percent_remaining(), 50);
            state.remaining_seconds = 1;
            assert_eq!(state.percent_remaining(), 0);
        }
    }

    // ------------------------------------------------------------------------
    // IPC Tests
    // ------------------------------------------------------------------------

    mod ipc_tests {
        use super::*;

        #[test]
        fn test_ipc_request_toggle_serialize() {
            let json = serde_json::to_string(&IpcRequest::Toggle).unwrap();
            assert_eq!(json, r#"{"command":"toggle"}"#);
        }

        #[test]
        fn test_ipc_request_toggle_floating_serialize() {
            let json = serde_json::to_string(&IpcRequest::ToggleFloating).unwrap();
            assert_eq!(json, r#"{"command":"toggle_floating"}"#);
        }

        #[test]
        fn test_ipc_request_configure_roundtrip() {
            let request = IpcRequest::Configure {
                settings: SettingsParams {
                    pomodoro_minutes: Some(30),
                    volume_level: Some(40),
                    ..SettingsParams::default()
                },
            };
            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains(r#""command":"configure""#));
            assert!(json.contains(r#""pomodoroMinutes":30"#));
            assert!(!json.contains("breakMinutes"));

            match serde_json::from_str::<IpcRequest>(&json).unwrap() {
                IpcRequest::Configure { settings } => {
                    assert_eq!(settings.pomodoro_minutes, Some(30));
                    assert_eq!(settings.volume_level, Some(40));
                    assert_eq!(settings.break_minutes, None);
                }
                other => panic!("Expected Configure, got {:?}", other),
            }
        }

        #[test]
        fn test_settings_params_is_empty() {
            assert!(SettingsParams::default().is_empty());
            let params = SettingsParams {
                notification_delay: Some(5),
                ..SettingsParams::default()
            };
            assert!(!params.is_empty());
        }

        #[test]
        fn test_response_data_from_timer_state() {
            let mut state = TimerState::new(TimerSettings::default());
            state.enter_mode(Mode::ShortBreak);
            state.activity = Activity::Paused;
            state.focus_count = 2;

            let data = ResponseData::from_timer_state(&state).with_floating(true);
            assert_eq!(data.mode.as_deref(), Some("short_break"));
            assert_eq!(data.activity.as_deref(), Some("paused"));
            assert_eq!(data.remaining_seconds, Some(300));
            assert_eq!(data.focus_count, Some(2));
            assert_eq!(data.floating_visible, Some(true));
        }

        #[test]
        fn test_ipc_response_success_and_error() {
            let ok = IpcResponse::success("done", None);
            assert_eq!(ok.status, "success");
            assert!(!ok.is_error());

            let err = IpcResponse::error("boom");
            assert_eq!(err.status, "error");
            assert_eq!(err.message, "boom");
            assert!(err.is_error());
        }

        #[test]
        fn test_ipc_request_all_commands() {
            for (json, expected) in [
                (r#"{"command":"start"}"#, "Start"),
                (r#"{"command":"pause"}"#, "Pause"),
                (r#"{"command":"resume"}"#, "Resume"),
                (r#"{"command":"stop"}"#, "Stop"),
                (r#"{"command":"status"}"#, "Status"),
                (r#"{"command":"quit"}"#, "Quit"),
            ] {
                let request: IpcRequest = serde_json::from_str(json).unwrap();
                assert_eq!(format!("{:?}", request), expected);
            }
        }
    }
}
