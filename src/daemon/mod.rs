//! Daemon module for the tray timer.
//!
//! This module contains the core daemon functionality:
//! - `timer`: timer engine with state transitions and surface fan-out
//! - `ticker`: the one-second tick source
//! - `event_loop`: the single consumer that serializes every mutation
//! - `ipc`: Unix socket server and request handling
//!
//! The tray must live on the main thread on macOS, so [`run`] keeps the
//! main thread for the tray and runs the engine, its ticks and the IPC
//! server on a dedicated thread with a current-thread tokio runtime.

pub mod event_loop;
pub mod ipc;
pub mod ticker;
pub mod timer;

pub use event_loop::{run_event_loop, EngineCommand};
pub use ipc::{default_socket_path, IpcServer, RequestHandler};
pub use ticker::{ManualTickSource, TickSource, TokioTickSource};
pub use timer::{Channels, TimerEngine, TimerEvent};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ConfigStore;
use crate::menubar::{TrayIconManager, TrayUpdate};
use crate::notification::{DesktopNotifier, DesktopOverlay};
use crate::sound::{default_chime, RodioChimePlayer};
use crate::types::{TimerSettings, TimerState};

/// Options for [`run`].
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    /// Config store location
    pub store: ConfigStore,
    /// IPC socket location
    pub socket_path: PathBuf,
    /// Show the floating chronometer from the start
    pub floating: bool,
}

/// Runs the daemon until it is told to quit.
///
/// Blocks the calling thread, which must be the main thread on macOS.
///
/// # Errors
///
/// Returns an error if the engine thread cannot start or the IPC socket
/// cannot be bound.
pub fn run(options: DaemonOptions) -> Result<()> {
    let settings = options.store.load();
    info!(
        config = %options.store.path().display(),
        socket = %options.socket_path.display(),
        "starting daemon"
    );

    let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let mut tray = TrayIconManager::new(&TimerState::new(settings.clone()), options.floating, tray_rx);

    let engine = EngineThread {
        settings,
        options,
        command_tx: command_tx.clone(),
        command_rx,
        tray_tx,
    };
    let engine_thread = std::thread::Builder::new()
        .name("engine".to_string())
        .spawn(move || engine.run())
        .context("failed to spawn engine thread")?;

    if let Err(e) = tray.initialize() {
        warn!(error = %e, "tray unavailable, use the CLI to control the timer");
    }
    tray.run_blocking(|action| {
        if command_tx.send(EngineCommand::Menu(action)).is_err() {
            debug!(action = %action, "engine gone, click dropped");
        }
    });

    // the tray may have gone away on its own
    let _ = command_tx.send(EngineCommand::Shutdown);
    drop(command_tx);

    engine_thread
        .join()
        .map_err(|_| anyhow::anyhow!("engine thread panicked"))?
}

/// Everything the engine thread takes ownership of.
struct EngineThread {
    settings: TimerSettings,
    options: DaemonOptions,
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    command_rx: mpsc::UnboundedReceiver<EngineCommand>,
    tray_tx: Sender<TrayUpdate>,
}

impl EngineThread {
    fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build engine runtime")?;
        runtime.block_on(self.serve())
    }

    async fn serve(self) -> Result<()> {
        let Self {
            settings,
            options,
            command_tx,
            command_rx,
            tray_tx,
        } = self;

        let server = IpcServer::new(&options.socket_path)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let channels = Channels {
            notifier: Arc::new(DesktopNotifier::new()),
            overlay: Arc::new(DesktopOverlay::new()),
            chime: Arc::new(RodioChimePlayer::new()),
            chime_source: default_chime(),
        };
        debug!(chime = %channels.chime_source.name(), "chime selected");

        let engine = TimerEngine::new(
            settings,
            TokioTickSource::new(command_tx.clone()),
            channels,
            tray_tx,
            event_tx,
        )
        .with_floating(options.floating);

        tokio::spawn(log_events(event_rx));
        let server_task = tokio::spawn(server.serve(command_tx.clone()));

        let signal_tx = command_tx;
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupted");
                let _ = signal_tx.send(EngineCommand::Shutdown);
            }
        });

        let handler = RequestHandler::new(engine, options.store);
        let handler = run_event_loop(handler, command_rx).await;
        info!(
            focus_count = handler.engine().state().focus_count,
            "daemon stopped"
        );

        // dropping the server removes the socket file
        server_task.abort();
        let _ = server_task.await;
        Ok(())
    }
}

async fn log_events(mut rx: mpsc::UnboundedReceiver<TimerEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            TimerEvent::Tick { remaining_seconds } => {
                tracing::trace!(remaining_seconds, "tick");
            }
            other => debug!(event = ?other, "timer event"),
        }
    }
}
