//! Configuration Module
//!
//! Loads cache and server configuration from environment variables.

use std::env;

/// Default size in bytes above which payloads are gzip-compressed.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 1024;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string for the backing store (`redis://…` or `memory://`).
    /// Empty disables caching entirely.
    pub connection_string: String,
    /// Secret the data protector derives its key from
    pub protection_key: String,
    /// Serialized payloads at least this many bytes long are compressed
    pub compression_threshold: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry purge interval in seconds (in-process backend only)
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CONNECTION_STRING` - Backing store URI (default: empty, cache disabled)
    /// - `CACHE_PROTECTION_KEY` - Payload protection secret (default: empty, ephemeral key)
    /// - `CACHE_COMPRESSION_THRESHOLD` - Compression threshold in bytes (default: 1024)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            connection_string: env::var("CACHE_CONNECTION_STRING").unwrap_or_default(),
            protection_key: env::var("CACHE_PROTECTION_KEY").unwrap_or_default(),
            compression_threshold: env::var("CACHE_COMPRESSION_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COMPRESSION_THRESHOLD),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Returns a copy of this config pointing at another backing store.
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = connection_string.into();
        self
    }

    /// True iff a non-empty connection string is configured.
    pub fn is_cache_enabled(&self) -> bool {
        !self.connection_string.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            protection_key: String::new(),
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
            server_port: 3000,
            cleanup_interval: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.connection_string.is_empty());
        assert_eq!(config.compression_threshold, DEFAULT_COMPRESSION_THRESHOLD);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 30);
        assert!(!config.is_cache_enabled());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CONNECTION_STRING");
        env::remove_var("CACHE_PROTECTION_KEY");
        env::remove_var("CACHE_COMPRESSION_THRESHOLD");
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");

        let config = Config::from_env();
        assert!(!config.is_cache_enabled());
        assert!(config.protection_key.is_empty());
        assert_eq!(config.compression_threshold, 1024);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 30);
    }

    #[test]
    fn test_blank_connection_string_disables_cache() {
        let config = Config::default().with_connection_string("   ");
        assert!(!config.is_cache_enabled());

        let config = Config::default().with_connection_string("memory://");
        assert!(config.is_cache_enabled());
    }
}
