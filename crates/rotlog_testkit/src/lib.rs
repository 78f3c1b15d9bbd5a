//! # rotlog Testkit
//!
//! Test utilities for rotlog.
//!
//! This crate provides:
//! - Temporary log fixtures with automatic cleanup
//! - Property-based payload generators using proptest
//! - Concurrent write stress helpers
//!
//! ## Usage
//!
//! ```rust
//! use rotlog_testkit::prelude::*;
//!
//! with_temp_log(100, |log| {
//!     log.write("hello").unwrap();
//!     assert_eq!(read_payloads(log), ["hello"]);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
