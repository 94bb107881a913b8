/*!
 * Error types for the srtsync application.
 *
 * This module contains custom error types for the subtitle model and the
 * command layer, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while loading, transforming or querying subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Source text does not follow the expected block structure
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// Source unreadable or destination unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A clock time or duration string could not be parsed
    #[error("Invalid time value: {0}")]
    Timestamp(String),

    /// Resync anchors point at cues with the same on-time
    #[error("Cannot resync: cues {index1} and {index2} both start at {time_ms}ms")]
    DivideByZero {
        index1: usize,
        index2: usize,
        time_ms: u32,
    },

    /// A 1-based cue index outside `[1, count]`
    #[error("Cue index {index} out of range (1..={count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// A transform pushed cue times outside `[0, u32::MAX]` ms
    #[error("{clamped} subtitle(s) would fall outside the representable time range")]
    TimeRangeExceeded { clamped: usize },

    /// Search exhausted all cues without a match
    #[error("No matching subtitle near {target_ms}ms")]
    NotFound { target_ms: u32 },
}

impl SubtitleError {
    // @creates: Parse error for a source line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Command line arguments could not be used
    #[error("Usage error: {0}")]
    Usage(String),

    /// Configuration file could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Subtitle(SubtitleError::NotFound { .. }) => 1,
            Self::Usage(_) => 2,
            _ => 3,
        }
    }

    /// Whether the failure is the normal "search found nothing" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Subtitle(SubtitleError::NotFound { .. }))
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<SubtitleError>() {
            Ok(subtitle_error) => Self::Subtitle(subtitle_error),
            Err(other) => Self::Unknown(format!("{:#}", other)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Subtitle(SubtitleError::Io(error))
    }
}
