//! Write command implementation.

use rotlog_core::{LogConfig, RotatingLog};
use std::path::Path;
use tracing::info;

/// Runs the write command.
pub fn run(
    path: &Path,
    config: LogConfig,
    payloads: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let log = RotatingLog::open_with_config(path, config)?;

    for payload in payloads {
        log.write(payload)?;
    }
    log.close()?;

    info!(path = %path.display(), count = payloads.len(), "appended payloads");
    Ok(())
}
