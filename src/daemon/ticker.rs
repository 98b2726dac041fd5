//! One-second tick scheduling.
//!
//! The engine owns exactly one [`TickSource`]. A source is either scheduled
//! (delivering ticks) or not. Cancelling an unscheduled source is a no-op;
//! scheduling an already scheduled source is a programming error.
//!
//! Every schedule starts a new generation. Ticks carry the generation they
//! were produced under, so a tick that was already queued when its source
//! was cancelled can be recognised and dropped.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error};

use super::event_loop::EngineCommand;

/// Tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A cancellable periodic tick.
pub trait TickSource {
    /// Starts delivering ticks.
    fn schedule(&mut self);

    /// Stops delivering ticks. Idempotent.
    fn cancel(&mut self);

    /// Returns true while ticks are being delivered.
    fn is_scheduled(&self) -> bool;

    /// Returns the generation of the current (or most recent) schedule.
    fn generation(&self) -> u64;
}

/// Reports a schedule on an already scheduled source.
///
/// Debug builds panic; release builds log and keep the existing schedule.
fn double_schedule(generation: u64) {
    debug_assert!(false, "tick source scheduled twice (generation {generation})");
    error!(generation, "tick source scheduled twice, keeping the existing one");
}

// ============================================================================
// TokioTickSource
// ============================================================================

/// Tick source backed by a tokio interval task.
///
/// Ticks are delivered as [`EngineCommand::Tick`] on the engine's command
/// channel. `schedule` must be called from within a tokio runtime.
#[derive(Debug)]
pub struct TokioTickSource {
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl TokioTickSource {
    pub fn new(command_tx: mpsc::UnboundedSender<EngineCommand>) -> Self {
        Self {
            command_tx,
            task: None,
            generation: 0,
        }
    }
}

impl TickSource for TokioTickSource {
    fn schedule(&mut self) {
        if self.task.is_some() {
            double_schedule(self.generation);
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        let tx = self.command_tx.clone();

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(EngineCommand::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        debug!(generation, "tick source scheduled");
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(generation = self.generation, "tick source cancelled");
        }
    }

    fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TokioTickSource {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// ManualTickSource
// ============================================================================

/// Tick source driven by hand, for tests.
///
/// Records how often it was actually scheduled and actually removed.
#[derive(Debug, Default)]
pub struct ManualTickSource {
    scheduled: bool,
    generation: u64,
    schedule_count: u32,
    cancel_count: u32,
}

impl ManualTickSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of schedules performed.
    #[must_use]
    pub fn schedule_count(&self) -> u32 {
        self.schedule_count
    }

    /// Number of removals of a scheduled source.
    #[must_use]
    pub fn cancel_count(&self) -> u32 {
        self.cancel_count
    }
}

impl TickSource for ManualTickSource {
    fn schedule(&mut self) {
        if self.scheduled {
            double_schedule(self.generation);
            return;
        }
        self.scheduled = true;
        self.generation += 1;
        self.schedule_count += 1;
    }

    fn cancel(&mut self) {
        if self.scheduled {
            self.scheduled = false;
            self.cancel_count += 1;
        }
    }

    fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

// ============================================================================
// Tests
// ============================================================================
