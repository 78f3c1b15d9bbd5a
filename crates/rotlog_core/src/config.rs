//! Log configuration.

use crate::error::{LogError, LogResult};

/// Default width of the frame length prefix in bytes.
pub const DEFAULT_PREFIX_WIDTH: u8 = 4;

/// Largest supported length prefix width (a full `u64`).
pub const MAX_PREFIX_WIDTH: u8 = 8;

/// Configuration for opening a rotating log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Size in bytes at which the active file is rolled over.
    ///
    /// The check runs after every write, so a file is rotated by the first
    /// write that brings it to or past this size.
    pub max_file_size: u64,

    /// Width in bytes of the big-endian frame length prefix.
    pub prefix_width: u8,

    /// Whether to `fsync` file data after every write in addition to flushing.
    pub sync_on_write: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024, // 1 MB
            prefix_width: DEFAULT_PREFIX_WIDTH,
            sync_on_write: false,
        }
    }
}

impl LogConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rollover threshold.
    #[must_use]
    pub const fn max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Sets the frame length prefix width.
    #[must_use]
    pub const fn prefix_width(mut self, width: u8) -> Self {
        self.prefix_width = width;
        self
    }

    /// Sets whether to sync file data on every write.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Checks that the configuration can be used to open a log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`] if the maximum file size is zero or
    /// the prefix width is not between 1 and 8 bytes.
    pub fn validate(&self) -> LogResult<()> {
        if self.max_file_size == 0 {
            return Err(LogError::invalid_config("max file size must be positive"));
        }
        check_prefix_width(self.prefix_width)
    }
}

pub(crate) fn check_prefix_width(width: u8) -> LogResult<()> {
    if width == 0 || width > MAX_PREFIX_WIDTH {
        return Err(LogError::invalid_config(format!(
            "prefix width must be between 1 and {MAX_PREFIX_WIDTH} bytes, got {width}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LogConfig::default();
        assert_eq!(config.max_file_size, 1024 * 1024);
        assert_eq!(config.prefix_width, 4);
        assert!(!config.sync_on_write);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = LogConfig::new()
            .max_file_size(100)
            .prefix_width(2)
            .sync_on_write(true);

        assert_eq!(config.max_file_size, 100);
        assert_eq!(config.prefix_width, 2);
        assert!(config.sync_on_write);
    }

    #[test]
    fn zero_max_size_rejected() {
        let result = LogConfig::new().max_file_size(0).validate();
        assert!(matches!(result, Err(LogError::InvalidConfig { .. })));
    }

    #[test]
    fn prefix_width_bounds() {
        assert!(LogConfig::new().prefix_width(0).validate().is_err());
        assert!(LogConfig::new().prefix_width(9).validate().is_err());
        assert!(LogConfig::new().prefix_width(1).validate().is_ok());
        assert!(LogConfig::new().prefix_width(8).validate().is_ok());
    }
}
