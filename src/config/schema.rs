//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `scribe.toml`.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Reference chunk size for sink writes (10 MB)
pub const DEFAULT_CHUNK_SIZE_BYTES: usize = 10_000_000;

/// Upper bound for concurrent media downloads
pub const MAX_MEDIA_CONCURRENCY: usize = 16;

/// Main Scribe configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScribeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Homeserver used to download media
    pub homeserver: HomeserverConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Timeline layout settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScribeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.homeserver.validate()?;
        self.export.validate()?;
        self.layout.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Homeserver connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeserverConfig {
    /// Base URL of the homeserver, e.g. `https://matrix.example.org`
    pub base_url: String,

    /// Access token used for authenticated media downloads
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl HomeserverConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("homeserver.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "homeserver.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }

        if let Some(token) = &self.access_token {
            if token.expose_secret().is_empty() {
                return Err("homeserver.access_token cannot be empty when set".to_string());
            }
        }

        if self.timeout_seconds == 0 {
            return Err("homeserver.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Size of each window written to the sink, in bytes
    #[serde(default = "default_chunk_size_bytes")]
    pub chunk_size_bytes: usize,

    /// Number of media downloads allowed in flight ahead of the document
    /// cursor. 1 resolves media strictly one event at a time.
    #[serde(default = "default_media_concurrency")]
    pub media_concurrency: usize,

    /// Fetch the room avatar into `room.png`
    #[serde(default = "default_true")]
    pub include_room_avatar: bool,

    /// Directory the file sink writes archives into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Archive file name prefix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size_bytes == 0 {
            return Err("export.chunk_size_bytes must be > 0".to_string());
        }

        if self.media_concurrency == 0 || self.media_concurrency > MAX_MEDIA_CONCURRENCY {
            return Err(format!(
                "export.media_concurrency must be between 1 and {}, got {}",
                MAX_MEDIA_CONCURRENCY, self.media_concurrency
            ));
        }

        if self.file_prefix.trim().is_empty() {
            return Err("export.file_prefix cannot be empty".to_string());
        }

        if self.file_prefix.contains(['/', '\\']) {
            return Err(format!(
                "export.file_prefix must not contain path separators, got '{}'",
                self.file_prefix
            ));
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            chunk_size_bytes: default_chunk_size_bytes(),
            media_concurrency: default_media_concurrency(),
            include_room_avatar: true,
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
        }
    }
}

/// Timeline layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Maximum gap between two messages of the same sender that still
    /// renders the second one as a continuation
    #[serde(default = "default_continuation_window_secs")]
    pub continuation_window_secs: u64,
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), String> {
        if self.continuation_window_secs > 86_400 {
            return Err(format!(
                "layout.continuation_window_secs must be <= 86400, got {}",
                self.continuation_window_secs
            ));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            continuation_window_secs: default_continuation_window_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_chunk_size_bytes() -> usize {
    DEFAULT_CHUNK_SIZE_BYTES
}

fn default_media_concurrency() -> usize {
    1
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_file_prefix() -> String {
    "matrix-export".to_string()
}

fn default_continuation_window_secs() -> u64 {
    300
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
