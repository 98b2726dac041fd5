//! Chime player implementation using rodio.
//!
//! Every chime gets its own detached thread. The thread opens its own output
//! stream, sink and decoder as locals and blocks until the sound has finished,
//! so all device handles are released when the thread returns, including on
//! early errors. Overlapping chimes are independent sessions.

use std::fs::File;
use std::io::BufReader;
use std::thread;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::ChimeSource;
use super::ChimePlayer;

/// Frequency of the fallback tone in Hz.
const TONE_FREQUENCY: f32 = 880.0;

/// Length of the fallback tone.
const TONE_DURATION: Duration = Duration::from_millis(400);

/// Plays chimes through the default output device.
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioChimePlayer;

impl RodioChimePlayer {
    /// Creates a new player. No device is opened until a chime plays.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Spawns the playback thread without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::SpawnError` if the thread could not be created.
    pub fn spawn(&self, source: &ChimeSource, volume: f32) -> Result<(), SoundError> {
        let source = source.clone();
        thread::Builder::new()
            .name("chime".to_string())
            .spawn(move || {
                if let Err(e) = play_blocking(&source, volume) {
                    report_failure(&source, &e);
                }
            })
            .map(drop)
            .map_err(|e| SoundError::SpawnError(e.to_string()))
    }
}

impl ChimePlayer for RodioChimePlayer {
    fn play_chime(&self, source: &ChimeSource, volume: f32) {
        if let Err(e) = self.spawn(source, volume) {
            warn!(error = %e, "could not start chime");
        }
    }
}

/// What ends up in the sink.
enum Chime {
    Decoded(Decoder<BufReader<File>>),
    Tone,
}

/// Resolves `source` before any device is opened.
///
/// A chime file that cannot be opened or decoded falls back to a tone.
fn prepare(source: &ChimeSource) -> Result<Chime, SoundError> {
    match source {
        ChimeSource::File { path } => match open_decoder(path) {
            Ok(decoder) => Ok(Chime::Decoded(decoder)),
            Err(e) if e.should_fallback_to_tone() => {
                warn!(error = %e, "falling back to generated tone");
                Ok(Chime::Tone)
            }
            Err(e) => Err(e),
        },
        ChimeSource::Tone => Ok(Chime::Tone),
    }
}

/// Plays `source` at `volume` on the calling thread and waits for it to end.
///
/// # Errors
///
/// Returns an error if no output device or sink can be opened.
pub fn play_blocking(source: &ChimeSource, volume: f32) -> Result<(), SoundError> {
    let chime = prepare(source)?;
    let (_stream, handle) =
        OutputStream::try_default().map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| SoundError::StreamError(e.to_string()))?;
    sink.set_volume(volume.clamp(0.0, 1.0));

    match chime {
        Chime::Decoded(decoder) => sink.append(decoder),
        Chime::Tone => sink.append(tone()),
    }

    debug!(chime = %source.name(), volume, "playing chime");
    sink.sleep_until_end();
    Ok(())
}

/// Logs a failed playback. Machines without an output device are common
/// (headless sessions, CI) so device failures stay at debug level.
///
/// Returns true if the failure was logged as a warning.
fn report_failure(source: &ChimeSource, e: &SoundError) -> bool {
    if e.is_device_error() {
        debug!(chime = %source.name(), error = %e, "no audio output, chime skipped");
        false
    } else {
        warn!(chime = %source.name(), error = %e, "chime playback failed");
        true
    }
}

fn open_decoder(path: &std::path::Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

fn tone() -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(TONE_FREQUENCY)
        .take_duration(TONE_DURATION)
        .amplify(0.3)
}
