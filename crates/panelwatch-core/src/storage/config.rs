//! Storage configuration.

use std::path::PathBuf;

/// Default on-disk location of the snapshot database.
pub const DEFAULT_DATA_PATH: &str = "./panelwatch_data";

/// Configuration for the sled snapshot store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the database directory.
    pub path: PathBuf,

    /// Page cache capacity in bytes.
    pub cache_capacity: u64,

    /// Flush interval in milliseconds. None means flush on every write.
    pub flush_every_ms: Option<u64>,

    /// Enable zstd compression.
    pub compression: bool,

    /// Temporary database (deleted on drop).
    pub temporary: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
            cache_capacity: 64 * 1024 * 1024, // 64MB
            flush_every_ms: None,
            compression: true,
            temporary: false,
        }
    }
}

impl StorageConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a temporary configuration for testing.
    pub fn temporary() -> Self {
        Self {
            path: PathBuf::from(""),
            temporary: true,
            ..Default::default()
        }
    }

    /// Set the page cache capacity.
    pub fn with_cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Flush periodically instead of on every write.
    pub fn with_flush_every_ms(mut self, ms: u64) -> Self {
        self.flush_every_ms = Some(ms);
        self
    }

    /// Convert to sled configuration.
    pub(crate) fn to_sled_config(&self) -> sled::Config {
        let mut config = sled::Config::new()
            .cache_capacity(self.cache_capacity)
            .use_compression(self.compression);

        if self.temporary {
            config = config.temporary(true);
        } else {
            config = config.path(&self.path);
        }

        config.flush_every_ms(self.flush_every_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(config.flush_every_ms.is_none());
        assert!(!config.temporary);
    }

    #[test]
    fn test_config_builder() {
        let config = StorageConfig::new("/var/lib/panelwatch")
            .with_cache_capacity(1024)
            .with_flush_every_ms(500);

        assert_eq!(config.path, PathBuf::from("/var/lib/panelwatch"));
        assert_eq!(config.cache_capacity, 1024);
        assert_eq!(config.flush_every_ms, Some(500));
    }

    #[test]
    fn test_temporary() {
        let config = StorageConfig::temporary();
        assert!(config.temporary);
    }
}
