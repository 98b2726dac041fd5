//! Timer engine for the Pomodoro timer.
//!
//! The engine owns the [`TimerState`] and is the only code that mutates it.
//! It is driven from a single task: user commands arrive through its entry
//! points and ticks arrive through [`TimerEngine::tick`].
//!
//! After every mutation the engine refreshes the tray in a fixed order:
//! tooltip, then the floating chronometer (only while visible), then the icon
//! (only if it changed). Chime, notification and overlay fire only when an
//! interval completes, never on ordinary ticks.

use std::sync::Arc;

use anyhow::Result;
use crossbeam_channel::Sender;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::menubar::{
    select_icon, tooltip, FloatingView, FloatingWindow, IconManager, MenuBuilder, TrayUpdate,
    ViewState,
};
use crate::notification::{
    NotificationContent, NotificationSender, NotificationType, Overlay, APP_TITLE,
    OVERLAY_DURATION_SECS,
};
use crate::sound::{ChimePlayer, ChimeSource};
use crate::types::{Activity, Mode, TimerSettings, TimerState};

use super::ticker::TickSource;

// ============================================================================
// TimerEvent
// ============================================================================

/// Transitions reported by the engine, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A focus interval started from idle
    Started,
    /// The countdown was suspended
    Paused,
    /// The countdown was resumed
    Resumed,
    /// The timer went back to idle in `mode`
    Stopped {
        /// Mode kept after stopping
        mode: Mode,
    },
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// A focus interval completed
    FocusCompleted {
        /// Focus intervals since the last long break (0 when a long break starts)
        focus_count: u32,
        /// Break that follows
        next_mode: Mode,
    },
    /// A break completed
    BreakCompleted {
        /// Break that ended
        mode: Mode,
    },
    /// Settings were replaced
    SettingsChanged,
    /// The floating chronometer was shown or hidden
    FloatingToggled {
        /// New visibility
        visible: bool,
    },
    /// The engine is shutting down
    Quit,
}

// ============================================================================
// Channels
// ============================================================================

/// Outbound channels used at interval completion.
#[derive(Clone)]
pub struct Channels {
    /// Desktop notifications
    pub notifier: Arc<dyn NotificationSender>,
    /// On-screen overlay
    pub overlay: Arc<dyn Overlay>,
    /// Chime playback
    pub chime: Arc<dyn ChimePlayer>,
    /// Sound to play
    pub chime_source: ChimeSource,
}

impl std::fmt::Debug for Channels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channels")
            .field("chime_source", &self.chime_source)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Owns the timer state machine and fans state out to every surface.
pub struct TimerEngine<T: TickSource> {
    /// Current timer state
    state: TimerState,
    /// The single tick source
    ticker: T,
    /// Notification, overlay and chime
    channels: Channels,
    /// Tray update channel
    tray_tx: Sender<TrayUpdate>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Last icon pushed to the tray
    icon_manager: IconManager,
    /// Floating chronometer visibility
    floating: FloatingWindow,
    /// Menu derivation
    menu_builder: MenuBuilder,
    /// Set by `quit`
    quitting: bool,
}

impl<T: TickSource> TimerEngine<T> {
    /// Creates an idle engine in Focus mode.
    pub fn new(
        settings: TimerSettings,
        ticker: T,
        channels: Channels,
        tray_tx: Sender<TrayUpdate>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(settings),
            ticker,
            channels,
            tray_tx,
            event_tx,
            icon_manager: IconManager::new(),
            floating: FloatingWindow::new(false),
            menu_builder: MenuBuilder::new(),
            quitting: false,
        }
    }

    /// Shows the floating chronometer from the start.
    #[must_use]
    pub fn with_floating(mut self, visible: bool) -> Self {
        self.floating = FloatingWindow::new(visible);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Derives the current view state.
    pub fn view_state(&self) -> ViewState {
        ViewState::from_state(&self.state)
    }

    /// Returns whether the floating chronometer is shown.
    pub fn floating_visible(&self) -> bool {
        self.floating.is_enabled()
    }

    /// Returns the generation ticks must carry to be accepted.
    pub fn tick_generation(&self) -> u64 {
        self.ticker.generation()
    }

    /// Returns a reference to the tick source.
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Returns true once `quit` has been called.
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Starts a focus interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is already running or paused.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_active() {
            anyhow::bail!("timer is already running");
        }

        self.state.enter_mode(Mode::Focus);
        self.state.activity = Activity::Running;
        self.ticker.schedule();

        info!(remaining = self.state.remaining_seconds, "timer started");
        self.emit(TimerEvent::Started);
        self.refresh();
        Ok(())
    }

    /// Starts from idle, pauses while running, resumes while paused.
    ///
    /// Returns the resulting activity.
    pub fn toggle_play_pause(&mut self) -> Activity {
        match self.state.activity {
            Activity::Idle => {
                self.state.enter_mode(Mode::Focus);
                self.state.activity = Activity::Running;
                self.ticker.schedule();
                info!("timer started");
                self.emit(TimerEvent::Started);
            }
            Activity::Running => {
                self.ticker.cancel();
                self.state.activity = Activity::Paused;
                info!(remaining = self.state.remaining_seconds, "timer paused");
                self.emit(TimerEvent::Paused);
            }
            Activity::Paused => {
                self.ticker.schedule();
                self.state.activity = Activity::Running;
                info!(remaining = self.state.remaining_seconds, "timer resumed");
                self.emit(TimerEvent::Resumed);
            }
        }
        self.refresh();
        self.state.activity
    }

    /// Pauses a running timer. Returns false (and does nothing) otherwise.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            debug!(activity = self.state.activity.as_str(), "pause ignored");
            return false;
        }
        self.toggle_play_pause();
        true
    }

    /// Resumes a paused timer. Returns false (and does nothing) otherwise.
    pub fn resume(&mut self) -> bool {
        if !self.state.is_paused() {
            debug!(activity = self.state.activity.as_str(), "resume ignored");
            return false;
        }
        self.toggle_play_pause();
        true
    }

    /// Returns to idle, resetting the current mode's countdown.
    ///
    /// The mode is kept: stopping during a break leaves an idle break.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer is idle.
    pub fn stop(&mut self) -> Result<()> {
        if !self.state.is_active() {
            anyhow::bail!("timer is not running");
        }

        if self.ticker.is_scheduled() {
            self.ticker.cancel();
        }
        self.state.activity = Activity::Idle;
        self.state.reset_remaining();

        info!(mode = self.state.mode.as_str(), "timer stopped");
        self.emit(TimerEvent::Stopped {
            mode: self.state.mode,
        });
        self.refresh();
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Ignored unless running.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            debug!("tick ignored while not running");
            return;
        }

        let completed = self.state.tick();
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });
        self.push_text_surfaces();

        if completed {
            self.complete_interval();
        }

        self.push_icon();
    }

    /// Cancels the tick source and asks the tray to shut down.
    pub fn quit(&mut self) {
        if self.ticker.is_scheduled() {
            self.ticker.cancel();
        }
        self.quitting = true;
        info!("engine shutting down");
        self.emit(TimerEvent::Quit);
        self.send(TrayUpdate::Shutdown);
    }

    /// Shows or hides the floating chronometer. Returns the new visibility.
    pub fn toggle_floating(&mut self) -> bool {
        let visible = self.floating.toggle();
        self.send(TrayUpdate::SetFloatingVisible(visible));
        if visible {
            self.push_floating();
        }
        self.emit(TimerEvent::FloatingToggled { visible });
        visible
    }

    /// Replaces the durable settings.
    ///
    /// A running or paused countdown keeps its remaining time; an idle timer
    /// is reset to the new duration of its mode.
    pub fn apply_settings(&mut self, settings: TimerSettings) {
        self.state.settings = settings;
        if !self.state.is_active() {
            self.state.reset_remaining();
        }
        info!("settings applied");
        self.emit(TimerEvent::SettingsChanged);
        self.refresh();
    }

    /// Sends a plain desktop notification.
    pub fn notify(&self, message: &str) {
        self.channels.notifier.notify(
            APP_TITLE,
            message,
            self.state.settings.notification_timeout_ms(),
        );
    }

    // ------------------------------------------------------------------------
    // Interval completion
    // ------------------------------------------------------------------------

    fn complete_interval(&mut self) {
        if self.state.settings.volume_percent > 0 {
            self.channels
                .chime
                .play_chime(&self.channels.chime_source, self.state.settings.volume_gain());
        }

        if self.state.mode == Mode::Focus {
            self.announce(NotificationType::FocusComplete);

            self.state.focus_count += 1;
            if self.state.focus_count >= self.state.settings.cycles_before_long_break {
                self.state.enter_mode(Mode::LongBreak);
                self.state.focus_count = 0;
            } else {
                self.state.enter_mode(Mode::ShortBreak);
            }

            info!(
                focus_count = self.state.focus_count,
                next = self.state.mode.as_str(),
                "focus interval completed"
            );
            self.emit(TimerEvent::FocusCompleted {
                focus_count: self.state.focus_count,
                next_mode: self.state.mode,
            });
            self.refresh();
        } else {
            let finished = self.state.mode;
            self.announce(NotificationType::BreakComplete);
            self.state.enter_mode(Mode::Focus);

            info!(mode = finished.as_str(), "break completed");
            self.emit(TimerEvent::BreakCompleted { mode: finished });

            if self.state.is_paused() {
                self.refresh();
            } else {
                self.toggle_play_pause();
            }
        }
    }

    /// Notification first, then the overlay with the same text.
    fn announce(&self, kind: NotificationType) {
        let content = NotificationContent::for_completion(kind, &self.state.settings);
        self.channels
            .notifier
            .notify(&content.title, &content.message, content.timeout_ms);

        if let Err(e) = self.channels.overlay.show(&content.message, OVERLAY_DURATION_SECS) {
            warn!(error = %e, "overlay unavailable");
        }
    }

    // ------------------------------------------------------------------------
    // Surface fan-out
    // ------------------------------------------------------------------------

    /// Pushes the full view: tooltip, floating chronometer, icon and menu.
    pub fn refresh(&mut self) {
        self.push_text_surfaces();
        self.push_icon();
        self.send(TrayUpdate::RebuildMenu(self.menu_builder.build(&self.state)));
    }

    fn push_text_surfaces(&mut self) {
        self.send(TrayUpdate::SetTooltip(tooltip(&self.state)));
        self.push_floating();
    }

    fn push_floating(&mut self) {
        let view = FloatingView::from_state(&self.state);
        if self.floating.render(view.clone()) {
            self.send(TrayUpdate::Floating(view));
        }
    }

    fn push_icon(&mut self) {
        let icon = select_icon(&self.state);
        if self.icon_manager.update(icon) {
            self.send(TrayUpdate::SetIcon(icon));
        }
    }

    fn send(&self, update: TrayUpdate) {
        if self.tray_tx.send(update).is_err() {
            debug!("tray is gone, dropping update");
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("no timer event listener");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::ticker::ManualTickSource;
    use crate::menubar::IconId;
    use crate::notification::{MockNotificationSender, MockOverlay};
    use crate::sound::MockChimePlayer;
    use crossbeam_channel::Receiver;

    struct Harness {
        engine: TimerEngine<ManualTickSource>,
        notifier: Arc<MockNotificationSender>,
        overlay: Arc<MockOverlay>,
        chime: Arc<MockChimePlayer>,
        tray_rx: Receiver<TrayUpdate>,
        event_rx: mpsc::UnboundedReceiver<TimerEvent>,
    }

    impl Harness {
        fn new(settings: TimerSettings) -> Self {
            let notifier = Arc::new(MockNotificationSender::new());
            let overlay = Arc::new(MockOverlay::new());
            let chime = Arc::new(MockChimePlayer::new());
            let channels = Channels {
                notifier: notifier.clone(),
                overlay: overlay.clone(),
                chime: chime.clone(),
                chime_source: ChimeSource::Tone,
            };
            let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
            let (event_tx, event_rx) = mpsc::unbounded_channel();
            let engine = TimerEngine::new(
                settings,
                ManualTickSource::new(),
                channels,
                tray_tx,
                event_tx,
            );
            Self {
                engine,
                notifier,
                overlay,
                chime,
                tray_rx,
                event_rx,
            }
        }

        fn ticks(&mut self, n: u32) {
            for _ in 0..n {
                self.engine.tick();
            }
        }

        fn drain_tray(&self) -> Vec<TrayUpdate> {
            self.tray_rx.try_iter().collect()
        }

        fn drain_events(&mut self) -> Vec<TimerEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.event_rx.try_recv() {
                events.push(event);
            }
            events
        }
    }

    fn short_settings() -> TimerSettings {
        TimerSettings {
            focus_seconds: 3,
            short_break_seconds: 2,
            long_break_seconds: 4,
            cycles_before_long_break: 2,
            ..TimerSettings::default()
        }
    }

    // ------------------------------------------------------------------------
    // Transition Tests
    // ------------------------------------------------------------------------

    mod transition_tests {
        use super::*;

        #[test]
        fn test_start_from_idle() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();

            let state = h.engine.state();
            assert_eq!(state.mode, Mode::Focus);
            assert_eq!(state.activity, Activity::Running);
            assert_eq!(state.remaining_seconds, 1500);
            assert!(h.engine.ticker().is_scheduled());
            assert_eq!(h.drain_events(), vec![TimerEvent::Started]);
        }

        #[test]
        fn test_start_while_active_fails() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            assert!(h.engine.start().is_err());
            h.engine.toggle_play_pause();
            assert!(h.engine.start().is_err());
            assert_eq!(h.engine.ticker().schedule_count(), 1);
        }

        #[test]
        fn test_start_from_idle_break_resets_to_focus() {
            let mut h = Harness::new(short_settings());
            h.engine.start().unwrap();
            h.ticks(3);
            assert_eq!(h.engine.state().mode, Mode::ShortBreak);
            h.engine.stop().unwrap();

            h.engine.start().unwrap();
            assert_eq!(h.engine.state().mode, Mode::Focus);
            assert_eq!(h.engine.state().remaining_seconds, 3);
        }

        #[test]
        fn test_toggle_cycle() {
            let mut h = Harness::new(TimerSettings::default());
            assert_eq!(h.engine.toggle_play_pause(), Activity::Running);
            h.ticks(10);
            assert_eq!(h.engine.toggle_play_pause(), Activity::Paused);
            assert!(!h.engine.ticker().is_scheduled());
            assert_eq!(h.engine.state().remaining_seconds, 1490);

            assert_eq!(h.engine.toggle_play_pause(), Activity::Running);
            assert!(h.engine.ticker().is_scheduled());
            assert_eq!(h.engine.state().remaining_seconds, 1490);
            assert_eq!(h.engine.ticker().schedule_count(), 2);
            assert_eq!(h.engine.ticker().cancel_count(), 1);
        }

        #[test]
        fn test_double_pause_removes_once() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            assert!(h.engine.pause());
            assert!(!h.engine.pause());
            assert_eq!(h.engine.ticker().cancel_count(), 1);
            assert_eq!(h.engine.state().activity, Activity::Paused);
        }

        #[test]
        fn test_resume_only_from_paused() {
            let mut h = Harness::new(TimerSettings::default());
            assert!(!h.engine.resume());
            h.engine.start().unwrap();
            assert!(!h.engine.resume());
            h.engine.pause();
            assert!(h.engine.resume());
            assert_eq!(h.engine.ticker().schedule_count(), 2);
        }

        #[test]
        fn test_stop_from_idle_fails() {
            let mut h = Harness::new(TimerSettings::default());
            assert!(h.engine.stop().is_err());
            assert_eq!(h.engine.ticker().cancel_count(), 0);
        }

        #[test]
        fn test_stop_resets_current_mode() {
            let mut h = Harness::new(short_settings());
            h.engine.start().unwrap();
            h.ticks(4);
            assert_eq!(h.engine.state().mode, Mode::ShortBreak);
            assert_eq!(h.engine.state().remaining_seconds, 1);

            h.engine.stop().unwrap();
            let state = h.engine.state();
            assert_eq!(state.mode, Mode::ShortBreak);
            assert_eq!(state.activity, Activity::Idle);
            assert_eq!(state.remaining_seconds, 2);
            assert!(!h.engine.ticker().is_scheduled());
        }

        #[test]
        fn test_stop_while_paused_does_not_cancel_again() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            h.ticks(5);
            h.engine.pause();
            h.engine.stop().unwrap();

            assert_eq!(h.engine.ticker().cancel_count(), 1);
            assert_eq!(h.engine.state().remaining_seconds, 1500);
            assert_eq!(h.engine.state().activity, Activity::Idle);
        }

        #[test]
        fn test_quit_cancels_and_shuts_tray() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            h.drain_tray();

            h.engine.quit();
            assert!(h.engine.is_quitting());
            assert!(!h.engine.ticker().is_scheduled());
            assert!(matches!(h.drain_tray().last(), Some(TrayUpdate::Shutdown)));
        }

        #[test]
        fn test_quit_when_idle_removes_nothing() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.quit();
            assert_eq!(h.engine.ticker().cancel_count(), 0);
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_decrements_by_one() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            for expected in (1490..1500).rev() {
                h.engine.tick();
                assert_eq!(h.engine.state().remaining_seconds, expected);
            }
        }

        #[test]
        fn test_tick_ignored_unless_running() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.tick();
            assert_eq!(h.engine.state().remaining_seconds, 1500);

            h.engine.start().unwrap();
            h.engine.pause();
            h.engine.tick();
            assert_eq!(h.engine.state().remaining_seconds, 1500);
        }

        #[test]
        fn test_ordinary_tick_fires_no_channels() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            h.ticks(100);
            assert_eq!(h.notifier.notify_count(), 0);
            assert_eq!(h.overlay.show_count(), 0);
            assert_eq!(h.chime.play_count(), 0);
        }

        #[test]
        fn test_tick_fan_out_order() {
            let mut h = Harness::new(TimerSettings {
                focus_seconds: 100,
                ..TimerSettings::default()
            })
            .engine_with_floating();
            h.engine.start().unwrap();
            h.drain_tray();

            // 100 -> 90 percent crosses from tier 100 to tier 90
            h.ticks(9);
            h.drain_tray();
            h.engine.tick();

            let updates = h.drain_tray();
            assert_eq!(updates.len(), 3);
            assert!(matches!(&updates[0], TrayUpdate::SetTooltip(t) if t == "Pomodoro - 01:30 remaining"));
            assert!(matches!(&updates[1], TrayUpdate::Floating(v) if v.chronometer == "01:30"));
            assert!(matches!(updates[2], TrayUpdate::SetIcon(IconId::Tier(90))));
        }

        #[test]
        fn test_icon_not_repainted_when_unchanged() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            h.drain_tray();
            h.engine.tick();

            let updates = h.drain_tray();
            assert_eq!(updates.len(), 1);
            assert!(matches!(updates[0], TrayUpdate::SetTooltip(_)));
        }

        #[test]
        fn test_hidden_floating_gets_no_updates() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            h.ticks(3);
            assert!(!h
                .drain_tray()
                .iter()
                .any(|u| matches!(u, TrayUpdate::Floating(_))));
        }
    }

    impl Harness {
        fn engine_with_floating(mut self) -> Self {
            self.engine.toggle_floating();
            self.drain_tray();
            self.drain_events();
            self
        }
    }

    // ------------------------------------------------------------------------
    // Interval Completion Tests
    // ------------------------------------------------------------------------

    mod completion_tests {
        use super::*;

        #[test]
        fn test_focus_completion_enters_short_break_running() {
            let mut h = Harness::new(short_settings());
            h.engine.start().unwrap();
            h.ticks(3);

            let state = h.engine.state();
            assert_eq!(state.mode, Mode::ShortBreak);
            assert_eq!(state.remaining_seconds, 2);
            assert_eq!(state.focus_count, 1);
            assert_eq!(state.activity, Activity::Running);

            let calls = h.notifier.get_calls();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].title, "Pomodoro Timer");
            assert_eq!(calls[0].message, "Pomodoro session ended!");
            assert_eq!(calls[0].timeout_ms, 10_000);
            assert_eq!(
                h.overlay.get_calls(),
                vec![("Pomodoro session ended!".to_string(), 2)]
            );
            assert_eq!(h.chime.get_play_calls(), vec![(ChimeSource::Tone, 1.0)]);
        }

        #[test]
        fn test_break_completion_forces_pause() {
            let mut h = Harness::new(short_settings());
            h.engine.start().unwrap();
            h.ticks(3 + 2);

            let state = h.engine.state();
            assert_eq!(state.mode, Mode::Focus);
            assert_eq!(state.remaining_seconds, 3);
            assert_eq!(state.activity, Activity::Paused);
            assert!(!h.engine.ticker().is_scheduled());
            assert_eq!(h.engine.ticker().cancel_count(), 1);

            let messages: Vec<String> =
                h.notifier.get_calls().into_iter().map(|c| c.message).collect();
            assert_eq!(
                messages,
                vec!["Pomodoro session ended!", "Break ended! Unpause to continue."]
            );
        }

        #[test]
        fn test_break_completion_while_paused_stays_paused() {
            let mut h = Harness::new(short_settings());
            h.engine.start().unwrap();
            h.ticks(3);
            h.engine.pause();

            h.engine.complete_interval();

            assert_eq!(h.engine.state().mode, Mode::Focus);
            assert_eq!(h.engine.state().activity, Activity::Paused);
            assert_eq!(h.engine.ticker().schedule_count(), 1);
            assert_eq!(h.engine.ticker().cancel_count(), 1);
        }

        #[test]
        fn test_mode_cycle_yields_one_long_break() {
            let settings = TimerSettings {
                focus_seconds: 2,
                short_break_seconds: 1,
                long_break_seconds: 3,
                cycles_before_long_break: 4,
                ..TimerSettings::default()
            };
            let mut h = Harness::new(settings);
            h.engine.start().unwrap();

            let mut entered = Vec::new();
            for cycle in 1..=4 {
                h.ticks(2);
                entered.push(h.engine.state().mode);
                if cycle < 4 {
                    assert_eq!(h.engine.state().focus_count, cycle);
                    // finish the short break, then resume the forced pause
                    h.ticks(1);
                    assert_eq!(h.engine.state().activity, Activity::Paused);
                    h.engine.resume();
                }
            }

            assert_eq!(
                entered,
                vec![Mode::ShortBreak, Mode::ShortBreak, Mode::ShortBreak, Mode::LongBreak]
            );
            assert_eq!(h.engine.state().focus_count, 0);
            assert_eq!(h.engine.state().remaining_seconds, 3);
        }

        #[test]
        fn test_zero_volume_skips_chime() {
            let mut h = Harness::new(short_settings().with_volume(0));
            h.engine.start().unwrap();
            h.ticks(3);
            assert_eq!(h.chime.play_count(), 0);
            assert_eq!(h.notifier.notify_count(), 1);
        }

        #[test]
        fn test_partial_volume_gain() {
            let mut h = Harness::new(short_settings().with_volume(40));
            h.engine.start().unwrap();
            h.ticks(3);
            assert_eq!(h.chime.get_play_calls()[0].1, 0.4);
        }

        #[test]
        fn test_notification_uses_configured_delay() {
            let settings = TimerSettings {
                notification_delay_seconds: 30,
                ..short_settings()
            };
            let mut h = Harness::new(settings);
            h.engine.start().unwrap();
            h.ticks(3);
            assert_eq!(h.notifier.get_calls()[0].timeout_ms, 30_000);
        }

        #[test]
        fn test_completion_events() {
            let mut h = Harness::new(short_settings());
            h.engine.start().unwrap();
            h.ticks(5);
            let events: Vec<TimerEvent> = h
                .drain_events()
                .into_iter()
                .filter(|e| !matches!(e, TimerEvent::Tick { .. }))
                .collect();
            assert_eq!(
                events,
                vec![
                    TimerEvent::Started,
                    TimerEvent::FocusCompleted {
                        focus_count: 1,
                        next_mode: Mode::ShortBreak
                    },
                    TimerEvent::BreakCompleted {
                        mode: Mode::ShortBreak
                    },
                    TimerEvent::Paused,
                ]
            );
        }

        #[test]
        fn test_end_to_end_defaults() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            assert_eq!(h.engine.state().mode, Mode::Focus);
            assert_eq!(h.engine.state().remaining_seconds, 1500);

            h.ticks(1500);
            let state = h.engine.state();
            assert_eq!(state.focus_count, 1);
            assert_eq!(state.mode, Mode::ShortBreak);
            assert_eq!(state.remaining_seconds, 300);
            assert_eq!(state.activity, Activity::Running);

            h.ticks(300);
            let state = h.engine.state();
            assert_eq!(state.mode, Mode::Focus);
            assert_eq!(state.remaining_seconds, 1500);
            assert_eq!(state.activity, Activity::Paused);
            assert_eq!(h.engine.view_state().icon, IconId::Paused);
        }
    }

    // ------------------------------------------------------------------------
    // Settings / Floating Tests
    // ------------------------------------------------------------------------

    mod settings_tests {
        use super::*;

        #[test]
        fn test_apply_settings_resets_idle_countdown() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine
                .apply_settings(TimerSettings::default().with_focus_minutes(50));
            assert_eq!(h.engine.state().remaining_seconds, 3000);
        }

        #[test]
        fn test_apply_settings_keeps_running_countdown() {
            let mut h = Harness::new(TimerSettings::default());
            h.engine.start().unwrap();
            h.ticks(10);
            h.engine
                .apply_settings(TimerSettings::default().with_focus_minutes(50));
            assert_eq!(h.engine.state().remaining_seconds, 1490);
            assert_eq!(h.engine.state().settings.focus_seconds, 3000);
        }

        #[test]
        fn test_toggle_floating() {
            let mut h = Harness::new(TimerSettings::default());
            assert!(h.engine.toggle_floating());
            let updates = h.drain_tray();
            assert!(matches!(updates[0], TrayUpdate::SetFloatingVisible(true)));
            assert!(matches!(&updates[1], TrayUpdate::Floating(v) if v.mode_label == "Pomodoro"));

            assert!(!h.engine.toggle_floating());
            let updates = h.drain_tray();
            assert_eq!(updates.len(), 1);
            assert!(!h.engine.floating_visible());
        }

        #[test]
        fn test_notify_uses_app_title() {
            let h = Harness::new(TimerSettings::default());
            h.engine.notify("hello");
            let calls = h.notifier.get_calls();
            assert_eq!(calls[0].title, "Pomodoro Timer");
            assert_eq!(calls[0].message, "hello");
        }
    }
}
