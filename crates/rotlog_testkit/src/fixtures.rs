//! Test fixtures and log helpers.
//!
//! Provides temporary logs that clean up after themselves and small helpers
//! for inspecting what ended up on disk.

use rotlog_core::{LogConfig, LogResult, RotatingLog};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of the active log inside a fixture directory.
pub const TEST_LOG_NAME: &str = "events.bin";

/// A rotating log in a temporary directory.
///
/// The directory and every backup in it are removed when this is dropped.
pub struct TestLog {
    /// The log instance.
    pub log: RotatingLog,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestLog {
    /// Creates a log that rolls over at `max_file_size` bytes.
    pub fn new(max_file_size: u64) -> Self {
        Self::with_config(LogConfig::new().max_file_size(max_file_size))
    }

    /// Creates a log with a full configuration.
    pub fn with_config(config: LogConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(TEST_LOG_NAME);
        let log = RotatingLog::open_with_config(&path, config).expect("Failed to open test log");
        Self { log, temp_dir }
    }

    /// Returns the temporary directory holding the log and its backups.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the path of the active file.
    pub fn path(&self) -> PathBuf {
        self.log.path().to_path_buf()
    }

    /// Closes this log and opens a new instance on the same path.
    pub fn reopen(&mut self) -> LogResult<()> {
        self.log.close()?;
        self.log = RotatingLog::open_with_config(&self.path(), *self.log.config())?;
        Ok(())
    }
}

impl std::ops::Deref for TestLog {
    type Target = RotatingLog;

    fn deref(&self) -> &Self::Target {
        &self.log
    }
}

/// Runs a test with a temporary log.
///
/// # Example
///
/// ```rust
/// use rotlog_testkit::with_temp_log;
///
/// with_temp_log(1000, |log| {
///     log.write("event").unwrap();
/// });
/// ```
pub fn with_temp_log<F, R>(max_file_size: u64, f: F) -> R
where
    F: FnOnce(&RotatingLog) -> R,
{
    let test_log = TestLog::new(max_file_size);
    f(&test_log.log)
}

/// Reads every payload of the log, panicking on any error.
pub fn read_payloads(log: &RotatingLog) -> Vec<String> {
    log.read()
        .collect::<LogResult<Vec<_>>>()
        .expect("Failed to read log")
}

/// Returns `(sequence, size in bytes)` for each backup of the log.
pub fn backup_sizes(log: &RotatingLog) -> Vec<(u64, u64)> {
    log.backups()
        .expect("Failed to list backups")
        .into_iter()
        .map(|backup| {
            let size = fs::metadata(&backup.path)
                .expect("Failed to stat backup")
                .len();
            (backup.seq, size)
        })
        .collect()
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a log with `count` numbered messages already written.
    ///
    /// Returns the log and the messages in write order.
    pub fn populated_log(max_file_size: u64, count: usize) -> (TestLog, Vec<String>) {
        let test_log = TestLog::new(max_file_size);
        let messages: Vec<String> = (0..count).map(|i| format!("Message {i}")).collect();
        for msg in &messages {
            test_log.write(msg).expect("Failed to write message");
        }
        (test_log, messages)
    }
}
