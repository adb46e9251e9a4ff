//! Configuration management for Scribe.
//!
//! Scribe reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SCRIBE_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [homeserver]
//! base_url = "https://matrix.example.org"
//! access_token = "${SCRIBE_ACCESS_TOKEN}"
//!
//! [export]
//! chunk_size_bytes = 10000000
//! media_concurrency = 4
//! output_dir = "exports"
//!
//! [layout]
//! continuation_window_secs = 300
//! ```
//!
//! ```rust,no_run
//! use scribe::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("scribe.toml")?;
//! println!("Homeserver: {}", config.homeserver.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, HomeserverConfig, LayoutConfig, LoggingConfig, ScribeConfig,
};
pub use secret::{secret_string, SecretString, Token};
