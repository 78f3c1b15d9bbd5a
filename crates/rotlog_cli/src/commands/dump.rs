//! Dump command implementation.

use rotlog_core::{read_log, LogConfig};
use serde::Serialize;
use std::path::Path;

/// One decoded payload for output.
#[derive(Debug, Serialize)]
pub struct PayloadInfo {
    /// Position of the payload in write order.
    pub index: usize,
    /// Payload length in bytes.
    pub len: usize,
    /// Decoded payload text.
    pub payload: String,
}

/// Runs the dump command.
///
/// Stops at the first corrupted frame and reports it as an error after
/// printing everything read before it.
pub fn run(
    path: &Path,
    config: &LogConfig,
    limit: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let max = limit.unwrap_or(usize::MAX);
    let mut payloads = Vec::new();
    let mut failure = None;

    for (index, result) in read_log(path, config)?.take(max).enumerate() {
        match result {
            Ok(payload) => payloads.push(PayloadInfo {
                index,
                len: payload.len(),
                payload,
            }),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&payloads)?);
        }
        _ => {
            print_text_output(&payloads);
        }
    }

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn print_text_output(payloads: &[PayloadInfo]) {
    println!("Payloads ({} total)", payloads.len());
    println!("================");
    println!();

    for info in payloads {
        println!("[{:08}] {:?}", info.index, info.payload);
    }
}
