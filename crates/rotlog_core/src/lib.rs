//! # rotlog
//!
//! A rotating, length-prefixed binary append log.
//!
//! Payloads are appended to an active file as frames. Once the active file
//! reaches a size threshold it is renamed to a numbered backup and a new
//! active file is started. Reading walks the backups in sequence order and
//! then the active file, yielding every payload in write order.
//!
//! ## File Layout
//!
//! ```text
//! logs/
//! ├─ events.0.bin     # first backup (oldest frames)
//! ├─ events.1.bin
//! └─ events.bin       # active file (newest frames)
//! ```
//!
//! ## Frame Format
//!
//! ```text
//! | length (4 bytes, big-endian) | payload (length bytes, UTF-8) |
//! ```
//!
//! ## Invariants
//!
//! - At most one handle to the active file is open per log
//! - A frame is written and flushed under the write lock, never partially
//! - Backup sequence numbers strictly increase in creation order
//! - A closed log stays closed; writes after close fail with [`LogError::Closed`]
//!
//! ## Example
//!
//! ```rust
//! use rotlog_core::{LogConfig, RotatingLog};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = LogConfig::new().max_file_size(64);
//! let log = RotatingLog::open_with_config(&dir.path().join("app.bin"), config).unwrap();
//!
//! for i in 0..10 {
//!     log.write(&format!("event {i}")).unwrap();
//! }
//! assert!(!log.backups().unwrap().is_empty());
//!
//! let events: Vec<String> = log.read().collect::<Result<_, _>>().unwrap();
//! assert_eq!(events.len(), 10);
//! assert_eq!(events[0], "event 0");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod file;
mod frame;
mod log;
mod naming;
mod reader;

pub use config::{LogConfig, DEFAULT_PREFIX_WIDTH, MAX_PREFIX_WIDTH};
pub use error::{LogError, LogResult};
pub use file::LogFile;
pub use frame::{decode_payload, FrameCodec, INCOMPLETE_PAYLOAD, INCOMPLETE_PREFIX};
pub use log::{read_log, RotatingLog};
pub use naming::{backup_path, last_sequence, list_backups, BackupFile};
pub use reader::LogReader;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
