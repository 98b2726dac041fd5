//! Component integration tests.
//!
//! Drives the engine with a manual tick source and applies its updates to a
//! real tray manager, checking what the tray ends up showing:
//! - Tooltip, icon tier and menu through a whole pomodoro
//! - Forced pause after a break
//! - Floating chronometer visibility
//! - Notification, overlay and chime at interval completion
//! - Settings loaded from the config store

use std::sync::Arc;

use tokio::sync::mpsc;

use pomotray::config::ConfigStore;
use pomotray::daemon::{Channels, ManualTickSource, TimerEngine, TimerEvent};
use pomotray::menubar::{FloatingImage, IconId, TrayIconManager, IDLE_TOOLTIP};
use pomotray::notification::{MockNotificationSender, MockOverlay};
use pomotray::sound::{ChimeSource, MockChimePlayer};
use pomotray::types::{Activity, Mode, TimerSettings, TimerState};

struct Setup {
    engine: TimerEngine<ManualTickSource>,
    tray: TrayIconManager,
    notifier: Arc<MockNotificationSender>,
    overlay: Arc<MockOverlay>,
    chime: Arc<MockChimePlayer>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
}

impl Setup {
    fn new(settings: TimerSettings) -> Self {
        let notifier = Arc::new(MockNotificationSender::new());
        let overlay = Arc::new(MockOverlay::new());
        let chime = Arc::new(MockChimePlayer::new());
        let channels = Channels {
            notifier: notifier.clone(),
            overlay: overlay.clone(),
            chime: chime.clone(),
            chime_source: ChimeSource::file("/usr/share/pomotray/sounds/ding.mp3"),
        };
        let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
        let (event_tx, events) = mpsc::unbounded_channel();
        let tray = TrayIconManager::new(&TimerState::new(settings.clone()), false, tray_rx);
        let engine = TimerEngine::new(settings, ManualTickSource::new(), channels, tray_tx, event_tx);
        Self {
            engine,
            tray,
            notifier,
            overlay,
            chime,
            events,
        }
    }

    /// Applies every pending tray update.
    fn sync_tray(&mut self) {
        while self.tray.process_pending_update() {}
    }

    fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.engine.tick();
        }
        self.sync_tray();
    }
}

fn short_settings() -> TimerSettings {
    TimerSettings {
        focus_seconds: 100,
        short_break_seconds: 10,
        long_break_seconds: 20,
        cycles_before_long_break: 2,
        ..TimerSettings::default()
    }
}

// ============================================================================
// Tray rendering
// ============================================================================

mod tray_rendering {
    use super::*;

    #[test]
    fn test_initial_tray() {
        let setup = Setup::new(TimerSettings::default());
        assert_eq!(setup.tray.tooltip(), IDLE_TOOLTIP);
        assert_eq!(setup.tray.icon(), IconId::Default);
        assert_eq!(setup.tray.menu().start_pause.text, "Start");
        assert!(setup.tray.menu().stop.is_none());
    }

    #[test]
    fn test_running_tray() {
        let mut setup = Setup::new(short_settings());
        setup.engine.start().unwrap();
        setup.ticks(1);

        assert_eq!(setup.tray.tooltip(), "Pomodoro - 01:39 remaining");
        assert_eq!(setup.tray.icon(), IconId::Tier(100));
        assert_eq!(setup.tray.menu().start_pause.text, "Pause");
        assert!(setup.tray.menu().stop.is_some());
    }

    #[test]
    fn test_icon_tiers_descend() {
        let mut setup = Setup::new(short_settings());
        setup.engine.start().unwrap();

        let mut seen = vec![];
        for _ in 0..99 {
            setup.ticks(1);
            let icon = setup.tray.icon();
            if seen.last() != Some(&icon) {
                seen.push(icon);
            }
        }
        assert_eq!(
            seen,
            vec![
                IconId::Tier(100),
                IconId::Tier(90),
                IconId::Tier(80),
                IconId::Tier(70),
                IconId::Tier(60),
                IconId::Tier(50),
                IconId::Tier(40),
                IconId::Tier(30),
                IconId::Tier(20),
                IconId::Tier(10),
                IconId::Tier(0),
            ]
        );
    }

    #[test]
    fn test_paused_tray() {
        let mut setup = Setup::new(short_settings());
        setup.engine.start().unwrap();
        setup.ticks(30);
        setup.engine.pause();
        setup.sync_tray();

        assert_eq!(setup.tray.icon(), IconId::Paused);
        assert_eq!(setup.tray.menu().start_pause.text, "Start");
        assert_eq!(setup.tray.tooltip(), "Pomodoro - 01:10 remaining");
    }

    #[test]
    fn test_stopped_tray() {
        let mut setup = Setup::new(short_settings());
        setup.engine.start().unwrap();
        setup.ticks(30);
        setup.engine.stop().unwrap();
        setup.sync_tray();

        assert_eq!(setup.tray.icon(), IconId::Default);
        assert!(setup.tray.menu().stop.is_none());
        assert_eq!(setup.tray.tooltip(), "Pomodoro - 01:40 remaining");
    }

    #[test]
    fn test_floating_chronometer() {
        let mut setup = Setup::new(short_settings());
        setup.engine.toggle_floating();
        setup.engine.start().unwrap();
        setup.ticks(100);

        let view = setup.tray.floating().last_view().unwrap().clone();
        assert!(setup.tray.floating().is_enabled());
        assert_eq!(view.mode_label, "Short Break");
        assert_eq!(view.chronometer, "00:10");
        assert_eq!(view.image, FloatingImage::Break);

        setup.engine.toggle_floating();
        setup.ticks(1);
        assert!(!setup.tray.floating().is_enabled());
        assert_eq!(
            setup.tray.floating().last_view().unwrap().chronometer,
            "00:10"
        );
    }
}

// ============================================================================
// Interval completion
// ============================================================================

mod completion {
    use super::*;

    #[test]
    fn test_full_set_reaches_long_break() {
        let mut setup = Setup::new(short_settings());
        setup.engine.start().unwrap();

        setup.ticks(100);
        assert_eq!(setup.engine.state().mode, Mode::ShortBreak);
        setup.ticks(10);
        assert_eq!(setup.engine.state().activity, Activity::Paused);
        assert_eq!(setup.tray.icon(), IconId::Paused);

        setup.engine.resume();
        setup.ticks(100);
        assert_eq!(setup.engine.state().mode, Mode::LongBreak);
        assert_eq!(setup.engine.state().focus_count, 0);
        assert_eq!(setup.tray.tooltip(), "Long Break - 00:20 remaining");

        setup.ticks(20);
        assert_eq!(setup.engine.state().mode, Mode::Focus);
        assert_eq!(setup.engine.state().activity, Activity::Paused);

        let messages: Vec<String> = setup
            .notifier
            .get_calls()
            .into_iter()
            .map(|call| call.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Pomodoro session ended!",
                "Break ended! Unpause to continue.",
                "Pomodoro session ended!",
                "Break ended! Unpause to continue.",
            ]
        );
        assert_eq!(setup.overlay.show_count(), 4);
        assert_eq!(setup.chime.play_count(), 4);
        assert_eq!(
            setup.chime.get_play_calls()[0].0,
            ChimeSource::file("/usr/share/pomotray/sounds/ding.mp3")
        );
    }

    #[test]
    fn test_events_describe_the_cycle() {
        let mut setup = Setup::new(short_settings());
        setup.engine.start().unwrap();
        setup.ticks(110);

        let mut milestones = vec![];
        while let Ok(event) = setup.events.try_recv() {
            if !matches!(event, TimerEvent::Tick { .. }) {
                milestones.push(event);
            }
        }
        assert_eq!(
            milestones,
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
    fn test_silent_when_volume_zero() {
        let mut setup = Setup::new(short_settings().with_volume(0));
        setup.engine.start().unwrap();
        setup.ticks(100);
        assert_eq!(setup.chime.play_count(), 0);
        assert_eq!(setup.notifier.notify_count(), 1);
    }
}

// ============================================================================
// Config store
// ============================================================================

mod config_store {
    use super::*;

    #[test]
    fn test_engine_uses_loaded_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomotray.cfg");
        std::fs::write(
            &path,
            "pomodoro_duration=50\nbreak_duration=10\nvolume_level=0\n",
        )
        .unwrap();

        let settings = ConfigStore::new(&path).load();
        let mut setup = Setup::new(settings);
        assert_eq!(setup.engine.state().remaining_seconds, 3000);

        setup.engine.start().unwrap();
        setup.ticks(3000);
        assert_eq!(setup.engine.state().remaining_seconds, 600);
        assert_eq!(setup.chime.play_count(), 0);
    }

    #[test]
    fn test_saved_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("pomotray.cfg"));
        let settings = short_settings().with_volume(30);

        store.save(&settings).unwrap();
        // durations are stored in whole minutes
        let loaded = store.load();
        assert_eq!(loaded.focus_seconds, 60);
        assert_eq!(loaded.cycles_before_long_break, 2);
        assert_eq!(loaded.volume_percent, 30);
    }
}
