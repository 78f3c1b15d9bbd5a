//! The rotating log: framed writes in, ordered payloads out.

use crate::config::LogConfig;
use crate::error::LogResult;
use crate::file::LogFile;
use crate::frame::FrameCodec;
use crate::naming::{list_backups, BackupFile};
use crate::reader::LogReader;
use std::path::Path;

/// A size-capped, length-prefixed binary append log.
///
/// Each [`write`](Self::write) appends one frame to the active file and
/// flushes it. When the active file reaches the configured size it is renamed
/// to the next numbered backup and a fresh active file is started.
/// [`read`](Self::read) yields every payload back in write order across all
/// backups and the active file.
///
/// # Thread Safety
///
/// `RotatingLog` is `Send + Sync`. Concurrent writers are serialized by an
/// internal lock; frames from different threads never interleave, and their
/// order in the log is the order in which they acquired the lock.
///
/// # Closing
///
/// Call [`close`](Self::close) to release the file handle. Dropping the log
/// also closes it, but any error from that final close is discarded. After a
/// close, explicit or caused by a failed write or rollover, every write fails
/// with [`LogError::Closed`](crate::LogError::Closed).
///
/// # Example
///
/// ```rust
/// use rotlog_core::RotatingLog;
///
/// let dir = tempfile::tempdir().unwrap();
/// let log = RotatingLog::open(&dir.path().join("events.bin"), 1000).unwrap();
///
/// log.write("User login: user123").unwrap();
/// log.write("User logout: user123").unwrap();
///
/// let events: Vec<String> = log.read().collect::<Result<_, _>>().unwrap();
/// assert_eq!(events, ["User login: user123", "User logout: user123"]);
/// log.close().unwrap();
/// ```
#[derive(Debug)]
pub struct RotatingLog {
    config: LogConfig,
    codec: FrameCodec,
    file: LogFile,
}

impl RotatingLog {
    /// Opens or creates a log at `path` that rolls over at `max_file_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`](crate::LogError::InvalidConfig) if
    /// `max_file_size` is zero, or
    /// [`LogError::Open`](crate::LogError::Open) if the file cannot be opened.
    pub fn open(path: &Path, max_file_size: u64) -> LogResult<Self> {
        Self::open_with_config(path, LogConfig::new().max_file_size(max_file_size))
    }

    /// Opens or creates a log at `path` with a full configuration.
    ///
    /// The configuration is validated before touching the file system.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`](crate::LogError::InvalidConfig) for
    /// an invalid configuration, or [`LogError::Open`](crate::LogError::Open)
    /// if the directories or the file cannot be created.
    pub fn open_with_config(path: &Path, config: LogConfig) -> LogResult<Self> {
        config.validate()?;
        let codec = FrameCodec::new(config.prefix_width)?;
        let file = LogFile::open(path, &config)?;
        Ok(Self {
            config,
            codec,
            file,
        })
    }

    /// Returns the path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the configuration the log was opened with.
    #[must_use]
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Returns `true` once the log is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.file.is_closed()
    }

    /// Returns the current size of the active file in bytes.
    #[must_use]
    pub fn active_size(&self) -> u64 {
        self.file.size()
    }

    /// Appends one payload to the log.
    ///
    /// The frame is written and flushed in full before this returns, and the
    /// active file is rolled over if it has reached the size threshold.
    ///
    /// # Errors
    ///
    /// - [`LogError::Closed`](crate::LogError::Closed) if the log is closed.
    /// - [`LogError::PayloadTooLarge`](crate::LogError::PayloadTooLarge) if the
    ///   payload does not fit the length prefix. The log stays open.
    /// - [`LogError::Io`](crate::LogError::Io) or
    ///   [`LogError::Rollover`](crate::LogError::Rollover) on I/O failure; the
    ///   log is closed.
    pub fn write(&self, payload: &str) -> LogResult<()> {
        let frame = self.codec.encode(payload)?;
        self.file.write_raw(&frame)
    }

    /// Rolls the active file over now, whatever its size.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Closed`](crate::LogError::Closed) if the log is
    /// closed, or [`LogError::Rollover`](crate::LogError::Rollover) if the
    /// rename or reopen fails.
    pub fn rotate(&self) -> LogResult<()> {
        self.file.rotate()
    }

    /// Returns a reader over every payload of this log, oldest first.
    ///
    /// Each call starts a fresh pass over the files on disk.
    #[must_use]
    pub fn read(&self) -> LogReader {
        self.read_from(self.path())
    }

    /// Returns a reader over the log stored at another `path`, using this
    /// log's frame format.
    ///
    /// This is how archived logs are read; no writer needs to be open on
    /// `path`.
    #[must_use]
    pub fn read_from(&self, path: &Path) -> LogReader {
        LogReader::with_codec(path, self.codec)
    }

    /// Lists this log's backups in sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error if the log's directory cannot be listed.
    pub fn backups(&self) -> LogResult<Vec<BackupFile>> {
        list_backups(self.path(), true)
    }

    /// Closes the log. Closing an already closed log is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails; the log is closed anyway.
    pub fn close(&self) -> LogResult<()> {
        self.file.close()
    }
}

impl Drop for RotatingLog {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Returns a reader over the log stored at `path`, without opening a writer.
///
/// # Errors
///
/// Returns [`LogError::InvalidConfig`](crate::LogError::InvalidConfig) if the
/// configured prefix width is invalid.
pub fn read_log(path: &Path, config: &LogConfig) -> LogResult<LogReader> {
    config.validate()?;
    Ok(LogReader::with_codec(
        path,
        FrameCodec::new(config.prefix_width)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use crate::naming::backup_path;
    use std::fs;
    use tempfile::tempdir;

    fn collect(reader: LogReader) -> Vec<String> {
        reader.collect::<LogResult<_>>().unwrap()
    }

    #[test]
    fn basic_write_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basic.bin");
        let log = RotatingLog::open(&path, 1000).unwrap();

        let messages = ["Message 1", "Message 2", "Message 3"];
        for msg in messages {
            log.write(msg).unwrap();
        }

        assert_eq!(collect(log.read_from(&path)), messages);
        log.close().unwrap();
    }

    #[test]
    fn empty_log() {
        let dir = tempdir().unwrap();
        let log = RotatingLog::open(&dir.path().join("empty.bin"), 1000).unwrap();

        assert!(collect(log.read()).is_empty());
    }

    #[test]
    fn zero_max_size_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("never.bin");

        let result = RotatingLog::open(&path, 0);
        assert!(matches!(result, Err(LogError::InvalidConfig { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn single_rollover() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rollover.bin");
        let log = RotatingLog::open(&path, 100).unwrap();

        let messages: Vec<String> = (0..20)
            .map(|i| format!("Message {i}{}", "x".repeat(20)))
            .collect();
        for msg in &messages {
            log.write(msg).unwrap();
        }
        log.close().unwrap();

        assert!(backup_path(&path, 0).exists());

        let reader = RotatingLog::open(&path, 100).unwrap();
        assert_eq!(collect(reader.read()), messages);
    }

    #[test]
    fn crossing_write_resets_active_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("threshold.bin");
        let log = RotatingLog::open(&path, 100).unwrap();
        let payload = "p".repeat(20);

        for _ in 0..4 {
            log.write(&payload).unwrap();
        }
        assert_eq!(log.active_size(), 96);
        assert!(log.backups().unwrap().is_empty());

        log.write(&payload).unwrap();
        assert_eq!(log.active_size(), 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);

        let backups = log.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].seq, 0);
        assert_eq!(fs::metadata(&backups[0].path).unwrap().len(), 120);
    }

    #[test]
    fn fifty_frames_across_backups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.bin");
        let log = RotatingLog::open(&path, 100).unwrap();

        let messages: Vec<String> = (0..50).map(|i| format!("{i:020}")).collect();
        for msg in &messages {
            log.write(msg).unwrap();
        }

        let backups = log.backups().unwrap();
        let seqs: Vec<u64> = backups.iter().map(|b| b.seq).collect();
        assert_eq!(seqs, (0..10).collect::<Vec<_>>());
        for backup in &backups {
            assert_eq!(fs::metadata(&backup.path).unwrap().len(), 5 * 24);
        }
        assert_eq!(log.active_size(), 0);
        assert_eq!(collect(log.read()), messages);
    }

    #[test]
    fn rollover_numbering_is_sequential() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("numbering.bin");
        let log = RotatingLog::open(&path, 50).unwrap();

        for i in 0..30 {
            log.write(&format!("Message {i}{}", "a".repeat(20))).unwrap();
        }

        let backups = log.backups().unwrap();
        assert!(!backups.is_empty());
        for (i, backup) in backups.iter().enumerate() {
            assert_eq!(backup.seq, i as u64);
        }
    }

    #[test]
    fn empty_strings_and_special_characters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("special.bin");
        let log = RotatingLog::open(&path, 1000).unwrap();

        let messages = [
            "",
            "Line\ntest",
            "Tab\ttest",
            "Null\0test",
            "Quote\"test",
            "Backslash\\test",
            "",
            "RecordSeparator\x1etest",
            "Unicode ✓ 日本",
        ];
        for msg in messages {
            log.write(msg).unwrap();
        }
        log.close().unwrap();

        let reader = RotatingLog::open(&path, 1000).unwrap();
        assert_eq!(collect(reader.read()), messages);
    }

    #[test]
    fn scoped_drop_closes_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scoped.bin");

        {
            let log = RotatingLog::open(&path, 1000).unwrap();
            log.write("Message 1").unwrap();
            log.write("Message 2").unwrap();
        }

        let reader = RotatingLog::open(&path, 1000).unwrap();
        assert_eq!(collect(reader.read()), ["Message 1", "Message 2"]);
    }

    #[test]
    fn write_after_close() {
        let dir = tempdir().unwrap();
        let log = RotatingLog::open(&dir.path().join("closed.bin"), 1000).unwrap();
        log.write("before").unwrap();
        log.close().unwrap();
        log.close().unwrap();

        assert!(log.is_closed());
        assert!(matches!(log.write("Should fail"), Err(LogError::Closed)));
        assert!(matches!(log.write(""), Err(LogError::Closed)));
    }

    #[test]
    fn read_after_close_still_works() {
        let dir = tempdir().unwrap();
        let log = RotatingLog::open(&dir.path().join("closed.bin"), 1000).unwrap();
        log.write("kept").unwrap();
        log.close().unwrap();

        assert_eq!(collect(log.read()), ["kept"]);
    }

    #[test]
    fn parent_directory_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("test.bin");

        let log = RotatingLog::open(&path, 1000).unwrap();
        log.write("Test message").unwrap();
        log.close().unwrap();

        assert!(path.exists());
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn reopen_continues_numbering() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.bin");

        let log = RotatingLog::open(&path, 10).unwrap();
        log.write("first rollover").unwrap();
        log.close().unwrap();

        let log = RotatingLog::open(&path, 10).unwrap();
        log.write("second rollover").unwrap();

        let seqs: Vec<u64> = log.backups().unwrap().iter().map(|b| b.seq).collect();
        assert_eq!(seqs, [0, 1]);
        assert_eq!(collect(log.read()), ["first rollover", "second rollover"]);
    }

    #[test]
    fn payload_too_large_keeps_log_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("narrow.bin");
        let config = LogConfig::new().max_file_size(1000).prefix_width(1);
        let log = RotatingLog::open_with_config(&path, config).unwrap();

        let result = log.write(&"z".repeat(300));
        assert!(matches!(result, Err(LogError::PayloadTooLarge { .. })));
        assert!(!log.is_closed());

        log.write("fits").unwrap();
        assert_eq!(collect(log.read()), ["fits"]);
        assert_eq!(collect(read_log(&path, &config).unwrap()), ["fits"]);
    }

    #[test]
    fn rotate_on_demand() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manual.bin");
        let log = RotatingLog::open(&path, 1000).unwrap();

        log.write("a").unwrap();
        log.rotate().unwrap();
        log.write("b").unwrap();

        assert_eq!(log.backups().unwrap().len(), 1);
        assert_eq!(collect(log.read()), ["a", "b"]);
    }

    #[test]
    fn deleted_backup_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.bin");
        let log = RotatingLog::open(&path, 10).unwrap();

        for msg in ["zero-0000", "one-11111", "two-22222", "tail"] {
            log.write(msg).unwrap();
        }
        fs::remove_file(backup_path(&path, 1)).unwrap();

        assert_eq!(collect(log.read()), ["zero-0000", "two-22222", "tail"]);
    }

    #[test]
    fn read_is_restartable() {
        let dir = tempdir().unwrap();
        let log = RotatingLog::open(&dir.path().join("again.bin"), 1000).unwrap();
        log.write("x").unwrap();

        let mut first = log.read();
        assert_eq!(first.next().unwrap().unwrap(), "x");
        assert_eq!(collect(log.read()), ["x"]);
        assert!(first.next().is_none());
    }
}
