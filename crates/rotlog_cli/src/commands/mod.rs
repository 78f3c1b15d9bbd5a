//! CLI command implementations.

pub mod backups;
pub mod demo;
pub mod dump;
pub mod write;
