//! Backup file naming and discovery.
//!
//! A backup of the active file `name.ext` is called `name.<seq>.ext`, where
//! `seq` is the base-10 rollover sequence number. An active file without an
//! extension, `name`, has backups called `name.<seq>`.
//!
//! ```text
//! logs/
//! ├─ events.0.bin     # oldest backup
//! ├─ events.1.bin
//! ├─ events.10.bin    # sorted after events.9.bin, never before events.2.bin
//! └─ events.bin       # active file
//! ```

use crate::error::LogResult;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A rotated log file and its sequence number.
///
/// Ordering compares the sequence number first, so a sorted list of backups
/// is in creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackupFile {
    /// Rollover sequence number embedded in the file name.
    pub seq: u64,
    /// Path to the backup file.
    pub path: PathBuf,
}

/// Returns the path of backup number `seq` for the given active file.
///
/// ```rust
/// use rotlog_core::backup_path;
/// use std::path::Path;
///
/// assert_eq!(
///     backup_path(Path::new("logs/events.bin"), 3),
///     Path::new("logs/events.3.bin")
/// );
/// ```
#[must_use]
pub fn backup_path(active: &Path, seq: u64) -> PathBuf {
    let (stem, suffix) = name_parts(active);
    active.with_file_name(format!("{stem}.{seq}{suffix}"))
}

/// Lists the existing backups of the given active file.
///
/// Only siblings named `<stem>.<digits><suffix>` are returned; anything whose
/// sequence segment is not a non-negative integer is ignored. A missing parent
/// directory yields an empty list.
///
/// With `sorted`, backups are ordered by numeric sequence number, ascending.
///
/// # Errors
///
/// Returns an error if the parent directory exists but cannot be listed.
pub fn list_backups(active: &Path, sorted: bool) -> LogResult<Vec<BackupFile>> {
    let entries = match fs::read_dir(parent_dir(active)) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let (stem, suffix) = name_parts(active);
    let mut backups = Vec::new();

    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(seq) = parse_sequence(name, &stem, &suffix) {
            backups.push(BackupFile {
                seq,
                path: active.with_file_name(name),
            });
        }
    }

    if sorted {
        backups.sort();
    }
    Ok(backups)
}

/// Returns the highest existing backup sequence number, or `None` if the
/// active file has never been rotated.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be listed.
pub fn last_sequence(active: &Path) -> LogResult<Option<u64>> {
    Ok(list_backups(active, false)?
        .into_iter()
        .map(|backup| backup.seq)
        .max())
}

/// Splits a file name into its stem and dotted suffix (`".bin"` or `""`).
fn name_parts(path: &Path) -> (Cow<'_, str>, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    (stem, suffix)
}

fn parse_sequence(name: &str, stem: &str, suffix: &str) -> Option<u64> {
    let digits = name
        .strip_prefix(stem)?
        .strip_prefix('.')?
        .strip_suffix(suffix)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
