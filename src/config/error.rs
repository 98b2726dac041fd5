//! Config store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, writing or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No config directory could be determined for the current user.
    #[error("could not determine a config directory")]
    NoConfigDir,

    /// A numeric entry of the configuration form was not a positive number.
    #[error("Please enter valid positive numbers. ({field})")]
    InvalidEntry {
        /// Name of the offending field
        field: &'static str,
    },
}

impl ConfigError {
    /// Returns true if the error came from user input rather than the filesystem.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidEntry { .. })
    }
}
