//! Error types for rotating log operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for log operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors that can occur while writing or reading a rotating log.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// The active file or its parent directories could not be created or opened.
    #[error("cannot open log file {}: {source}", path.display())]
    Open {
        /// Path of the active log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The log is closed, either explicitly or after a failed write.
    #[error("log is closed")]
    Closed,

    /// A frame in a log file is truncated.
    #[error("log file {} corrupted: {message}", path.display())]
    Corrupted {
        /// The file being read.
        path: PathBuf,
        /// Description of the corruption.
        message: String,
    },

    /// Renaming or reopening the active file during rollover failed.
    ///
    /// The log is closed when this is returned.
    #[error("rollover of {} failed: {source}", path.display())]
    Rollover {
        /// Path of the active log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A payload does not fit in the configured length prefix.
    #[error("payload of {len} bytes exceeds the maximum frame payload of {max} bytes")]
    PayloadTooLarge {
        /// Encoded payload length.
        len: usize,
        /// Largest length the prefix can represent.
        max: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LogError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a corruption error for the given file.
    pub fn corrupted(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupted {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(LogError::Closed.to_string(), "log is closed");

        let err = LogError::corrupted("logs/a.bin", "incomplete length prefix");
        assert_eq!(
            err.to_string(),
            "log file logs/a.bin corrupted: incomplete length prefix"
        );

        let err = LogError::invalid_config("max file size must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: max file size must be positive"
        );
    }
}
