//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Scribe configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading already validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Homeserver: {}", config.homeserver.base_url);
        println!(
            "  Access Token: {}",
            if config.homeserver.access_token.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  File Prefix: {}", config.export.file_prefix);
        println!("  Chunk Size: {} bytes", config.export.chunk_size_bytes);
        println!("  Media Concurrency: {}", config.export.media_concurrency);
        println!("  Room Avatar: {}", config.export.include_room_avatar);
        println!(
            "  Continuation Window: {}s",
            config.layout.continuation_window_secs
        );
        println!();
        Ok(0)
    }
}
