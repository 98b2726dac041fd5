//! Chime playback for interval completion.
//!
//! The engine asks for a chime and moves on. Playback happens on a detached
//! thread owned by the player; the engine never joins it and never sees its
//! failures.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomotray::sound::{default_chime, ChimePlayer, RodioChimePlayer};
//!
//! let player = RodioChimePlayer::new();
//! player.play_chime(&default_chime(), 0.8);
//! ```

mod error;
mod player;
mod source;

pub use error::SoundError;
pub use player::{play_blocking, RodioChimePlayer};
pub use source::{data_dir, default_chime, ChimeSource, CHIME_FILE, DATA_DIR_ENV};

/// Trait for chime playback implementations.
///
/// `play_chime` must return without waiting for playback.
pub trait ChimePlayer: Send + Sync {
    /// Starts playing `source` at `volume` (0.0-1.0).
    fn play_chime(&self, source: &ChimeSource, volume: f32);
}

/// Mock chime player for testing.
#[derive(Debug, Default)]
pub struct MockChimePlayer {
    play_calls: std::sync::Mutex<Vec<(ChimeSource, f32)>>,
}

impl MockChimePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<(ChimeSource, f32)> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl ChimePlayer for MockChimePlayer {
    fn play_chime(&self, source: &ChimeSource, volume: f32) {
        self.play_calls
            .lock()
            .unwrap()
            .push((source.clone(), volume));
    }
}
