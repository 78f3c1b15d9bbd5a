//! Backups command implementation.

use rotlog_core::list_backups;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A backup file for output.
#[derive(Debug, Serialize)]
pub struct BackupInfo {
    /// Rollover sequence number.
    pub seq: u64,
    /// Path to the backup file.
    pub path: String,
    /// File size in bytes, if the file is still readable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Runs the backups command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let backups: Vec<BackupInfo> = list_backups(path, true)?
        .into_iter()
        .map(|backup| BackupInfo {
            seq: backup.seq,
            size: fs::metadata(&backup.path).ok().map(|m| m.len()),
            path: backup.path.display().to_string(),
        })
        .collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&backups)?);
        }
        _ => {
            println!("Backups of {} ({} total)", path.display(), backups.len());
            for backup in &backups {
                match backup.size {
                    Some(size) => println!("  {:>6}  {:>10} bytes  {}", backup.seq, size, backup.path),
                    None => println!("  {:>6}  {:>10}        {}", backup.seq, "-", backup.path),
                }
            }
        }
    }

    Ok(())
}
