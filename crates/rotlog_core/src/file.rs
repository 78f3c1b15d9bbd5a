//! The active log file and its rollover state machine.

use crate::config::LogConfig;
use crate::error::{LogError, LogResult};
use crate::naming::{backup_path, last_sequence};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Mutable state guarded by the write lock.
#[derive(Debug)]
struct FileState {
    /// Handle to the active file. `None` once closed.
    handle: Option<File>,
    /// Current length of the active file in bytes.
    size: u64,
    /// Sequence number the next rollover will assign.
    next_seq: u64,
}

/// Owns the active file of a rotating log.
///
/// Every append holds a single mutex across the write, the flush, the size
/// check and, when the threshold is reached, the rollover. Rollover is a step
/// inside that critical section, so a frame is never split across files and
/// two writers never race a rename.
///
/// # States
///
/// ```text
/// Open ──write──▶ size check ──≥ max──▶ Rolling ──▶ Open
///   │                                     │
///   └──close / I/O failure──▶ Closed ◀────┘ (rename or reopen failed)
/// ```
///
/// `Closed` is terminal; a new `LogFile` must be opened to continue.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    max_file_size: u64,
    sync_on_write: bool,
    state: Mutex<FileState>,
}

impl LogFile {
    /// Opens or creates the active file, creating parent directories if needed.
    ///
    /// The rollover sequence continues after the highest existing backup, so
    /// reopening a log never reuses a backup name.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Open`] if the directories cannot be created, the
    /// existing backups cannot be listed, the highest backup already uses the
    /// last sequence number, or the file cannot be opened.
    pub fn open(path: &Path, config: &LogConfig) -> LogResult<Self> {
        config.validate()?;

        let open_err = |source: io::Error| LogError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(open_err)?;
        }

        let next_seq = match last_sequence(path) {
            Ok(None) => 0,
            Ok(Some(last)) => last
                .checked_add(1)
                .ok_or_else(|| open_err(sequence_exhausted()))?,
            Err(LogError::Io(e)) => return Err(open_err(e)),
            Err(e) => return Err(e),
        };

        let handle = open_active(path).map_err(open_err)?;
        let size = handle.metadata().map_err(open_err)?.len();

        debug!(path = %path.display(), size, next_seq, "opened log file");

        Ok(Self {
            path: path.to_path_buf(),
            max_file_size: config.max_file_size,
            sync_on_write: config.sync_on_write,
            state: Mutex::new(FileState {
                handle: Some(handle),
                size,
                next_seq,
            }),
        })
    }

    /// Returns the path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current size of the active file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.state.lock().size
    }

    /// Returns the sequence number the next rollover will assign.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.state.lock().next_seq
    }

    /// Returns `true` once the file has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().handle.is_none()
    }

    /// Appends `data` as one write, flushes it, and rolls over if the active
    /// file has reached the size threshold.
    ///
    /// # Errors
    ///
    /// - [`LogError::Closed`] if the file is closed.
    /// - [`LogError::Io`] if the write or flush fails; the file is closed.
    /// - [`LogError::Rollover`] if the rollover fails; the file is closed.
    pub fn write_raw(&self, data: &[u8]) -> LogResult<()> {
        let mut state = self.state.lock();
        let Some(handle) = state.handle.as_mut() else {
            return Err(LogError::Closed);
        };

        // A failed write may have left a partial frame on disk; never retry.
        if let Err(e) = write_flushed(handle, data, self.sync_on_write) {
            warn!(path = %self.path.display(), error = %e, "write failed, closing log");
            state.handle = None;
            return Err(e.into());
        }
        state.size += data.len() as u64;

        if state.size >= self.max_file_size {
            self.rollover(&mut state)?;
        }
        Ok(())
    }

    /// Forces a rollover regardless of the current size.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Closed`] if the file is closed, or
    /// [`LogError::Rollover`] if the rename or reopen fails.
    pub fn rotate(&self) -> LogResult<()> {
        let mut state = self.state.lock();
        if state.handle.is_none() {
            return Err(LogError::Closed);
        }
        self.rollover(&mut state)
    }

    /// Closes the active file. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the final sync fails. The file is closed either way.
    pub fn close(&self) -> LogResult<()> {
        let mut state = self.state.lock();
        let Some(mut handle) = state.handle.take() else {
            return Ok(());
        };
        handle.flush()?;
        if self.sync_on_write {
            handle.sync_all()?;
        }
        debug!(path = %self.path.display(), "closed log file");
        Ok(())
    }

    /// Renames the active file to the next backup and reopens it empty.
    ///
    /// Must be called with the state lock held. On failure the file is left
    /// closed and is never retried.
    fn rollover(&self, state: &mut FileState) -> LogResult<()> {
        // Drop the handle before renaming so only one handle to the path exists.
        state.handle = None;

        let rollover_err = |source: io::Error| {
            warn!(path = %self.path.display(), error = %source, "rollover failed, closing log");
            LogError::Rollover {
                path: self.path.clone(),
                source,
            }
        };

        if self.path.exists() {
            let following = state
                .next_seq
                .checked_add(1)
                .ok_or_else(|| rollover_err(sequence_exhausted()))?;
            let backup = backup_path(&self.path, state.next_seq);
            fs::rename(&self.path, &backup).map_err(rollover_err)?;
            debug!(
                path = %self.path.display(),
                backup = %backup.display(),
                seq = state.next_seq,
                size = state.size,
                "rolled over log file"
            );
            state.next_seq = following;
        }

        let handle = open_active(&self.path).map_err(rollover_err)?;
        state.size = handle.metadata().map_err(rollover_err)?.len();
        state.handle = Some(handle);
        Ok(())
    }
}

fn open_active(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
}

fn sequence_exhausted() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "backup sequence numbers exhausted")
}

fn write_flushed(handle: &mut File, data: &[u8], sync: bool) -> io::Result<()> {
    handle.write_all(data)?;
    handle.flush()?;
    if sync {
        handle.sync_data()?;
    }
    Ok(())
}
