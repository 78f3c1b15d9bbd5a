//! Demo command implementation.

use rotlog_core::{LogConfig, RotatingLog};
use std::path::Path;
use tracing::info;

/// Rollover threshold used by the demo, small enough to produce backups.
const DEMO_MAX_SIZE: u64 = 1000;

const EVENTS: [&str; 4] = [
    "User login: user123",
    "Action performed: file_upload",
    "Data processed: 1024 bytes",
    "User logout: user123",
];

/// Runs the demo: writes 40 sample events and prints them back.
pub fn run(path: &Path, prefix_width: u8) -> Result<(), Box<dyn std::error::Error>> {
    let config = LogConfig::new()
        .max_file_size(DEMO_MAX_SIZE)
        .prefix_width(prefix_width);
    let log = RotatingLog::open_with_config(path, config)?;

    for event in EVENTS.iter().cycle().take(10 * EVENTS.len()) {
        log.write(event)?;
    }
    info!(path = %path.display(), backups = log.backups()?.len(), "wrote demo events");

    println!("Rewinding logged events:");
    for (index, event) in log.read().enumerate() {
        println!("({index}, {:?})", event?);
    }

    log.close()?;
    Ok(())
}
