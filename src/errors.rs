/*!
 * Error types for the srtfix application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur during subtitle parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// The second line of a block could not be split into a start and an end timestamp
    #[error("Malformed timecode line in block {block}: '{line}'")]
    MalformedTimecodeLine {
        /// 1-based block number in the source file
        block: usize,
        /// The offending line
        line: String,
    },

    /// A single timestamp did not match `HH:MM:SS,mmm` (strict mode only)
    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
