//! Chime source resolution.
//!
//! The chime ships as `sounds/ding.mp3` in the application data directory.
//! The directory is `$POMOTRAY_DATA_DIR` when set, otherwise
//! `<user data dir>/pomotray`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "POMOTRAY_DATA_DIR";

/// Chime file path relative to the data directory.
pub const CHIME_FILE: &str = "sounds/ding.mp3";

/// What to play at interval completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChimeSource {
    /// A sound file decoded by rodio.
    File {
        /// Path to the file
        path: PathBuf,
    },
    /// A short generated tone, used when no file is available.
    Tone,
}

impl ChimeSource {
    /// Creates a file chime source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Tone => None,
        }
    }

    /// Returns a short name for logging.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Tone => "tone".to_string(),
        }
    }
}

/// Returns the application data directory, if one can be determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    dirs::data_dir().map(|d| d.join("pomotray"))
}

/// Returns the default chime: the data directory's chime file if it exists,
/// the generated tone otherwise.
#[must_use]
pub fn default_chime() -> ChimeSource {
    chime_in(data_dir().as_deref())
}

fn chime_in(dir: Option<&Path>) -> ChimeSource {
    match dir.map(|d| d.join(CHIME_FILE)) {
        Some(path) if path.is_file() => ChimeSource::File { path },
        _ => ChimeSource::Tone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source() {
        let source = ChimeSource::file("/usr/share/pomotray/sounds/ding.mp3");
        assert_eq!(
            source.path(),
            Some(Path::new("/usr/share/pomotray/sounds/ding.mp3"))
        );
        assert_eq!(source.name(), "ding.mp3");
    }

    #[test]
    fn test_tone_source() {
        assert_eq!(ChimeSource::Tone.path(), None);
        assert_eq!(ChimeSource::Tone.name(), "tone");
    }

    #[test]
    fn test_chime_in_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sounds")).unwrap();
        std::fs::write(dir.path().join(CHIME_FILE), b"fake").unwrap();

        let source = chime_in(Some(dir.path()));
        assert_eq!(source, ChimeSource::file(dir.path().join(CHIME_FILE)));
    }

    #[test]
    fn test_chime_in_missing_file_is_tone() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(chime_in(Some(dir.path())), ChimeSource::Tone);
        assert_eq!(chime_in(None), ChimeSource::Tone);
    }

    #[test]
    fn test_default_chime_no_panic() {
        let _ = default_chime();
    }
}
