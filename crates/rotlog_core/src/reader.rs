//! Streaming reader over a log file and its backups.
//!
//! ## Recovery Policy
//!
//! The reader distinguishes between **skipped** and **fatal** conditions:
//!
//! ### Skipped (reading continues with the next file)
//!
//! - A backup or active file that cannot be opened (deleted, permission
//!   denied, replaced by a directory).
//!
//! ### Fatal (one error is yielded, then iteration ends)
//!
//! - **Truncated length prefix** inside an opened file → `Err(Corrupted)`
//! - **Truncated payload** inside an opened file → `Err(Corrupted)`
//! - Any other read error → `Err(Io)`
//!
//! Nothing after a truncated frame is returned, including later files.

use crate::error::{LogError, LogResult};
use crate::frame::{decode_payload, FrameCodec};
use crate::naming::list_backups;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A lazy iterator over every payload of a log, oldest first.
///
/// Backups are visited in ascending sequence order and the active file last.
/// Files are listed when iteration starts and opened one at a time as the
/// previous one is exhausted.
///
/// The reader takes no lock. If a writer rolls over while a reader is
/// enumerating, the reader may miss the renamed file or see the same frames
/// twice (once as the old active file, once as the new backup). Read a log
/// while it is not being written when an exact snapshot is needed.
///
/// # Example
///
/// ```no_run
/// use rotlog_core::LogReader;
/// use std::path::Path;
///
/// for payload in LogReader::new(Path::new("logs/events.bin")) {
///     println!("{}", payload?);
/// }
/// # Ok::<(), rotlog_core::LogError>(())
/// ```
#[derive(Debug)]
pub struct LogReader {
    path: PathBuf,
    codec: FrameCodec,
    /// Files still to visit. `None` until the first call to `next`.
    pending: Option<VecDeque<PathBuf>>,
    /// The file currently being decoded.
    current: Option<(PathBuf, BufReader<File>)>,
    finished: bool,
}

impl LogReader {
    /// Creates a reader for the log at `path` with the default 4-byte prefix.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self::with_codec(path, FrameCodec::default())
    }

    /// Creates a reader for the log at `path` using the given frame codec.
    #[must_use]
    pub fn with_codec(path: &Path, codec: FrameCodec) -> Self {
        Self {
            path: path.to_path_buf(),
            codec,
            pending: None,
            current: None,
            finished: false,
        }
    }

    /// Returns the active file path this reader was created for.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lists the files to read: sorted backups, then the active file.
    fn list_files(&self) -> LogResult<VecDeque<PathBuf>> {
        let mut files: VecDeque<PathBuf> = list_backups(&self.path, true)?
            .into_iter()
            .map(|backup| backup.path)
            .collect();
        files.push_back(self.path.clone());
        Ok(files)
    }

    /// Opens the next readable file, skipping any that cannot be opened.
    ///
    /// Returns `false` once every file has been visited.
    fn advance(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        while let Some(path) = pending.pop_front() {
            match open_regular(&path) {
                Ok(file) => {
                    self.current = Some((path, BufReader::new(file)));
                    return true;
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable log file");
                }
            }
        }
        false
    }

    fn fail(&mut self, err: LogError) -> Option<LogResult<String>> {
        self.finished = true;
        self.current = None;
        Some(Err(err))
    }
}

impl Iterator for LogReader {
    type Item = LogResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.pending.is_none() {
            match self.list_files() {
                Ok(files) => self.pending = Some(files),
                Err(e) => return self.fail(e),
            }
        }

        loop {
            if self.current.is_none() && !self.advance() {
                self.finished = true;
                return None;
            }
            let (path, reader) = self.current.as_mut()?;

            match self.codec.read_frame(reader) {
                Ok(Some(bytes)) => return Some(Ok(decode_payload(bytes))),
                Ok(None) => self.current = None,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    let err = LogError::corrupted(path.clone(), e.to_string());
                    return self.fail(err);
                }
                Err(e) => return self.fail(e.into()),
            }
        }
    }
}

impl FusedIterator for LogReader {}

fn open_regular(path: &Path) -> io::Result<File> {
    let file = File::open(path)?;
    if file.metadata()?.is_dir() {
        return Err(io::Error::new(io::ErrorKind::Other, "is a directory"));
    }
    Ok(file)
}
