//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "scribe.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Scribe configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your homeserver URL", self.output);
                println!("  2. Create a .env file with SCRIBE_ACCESS_TOKEN=<your token>");
                println!("  3. Validate configuration: scribe validate-config");
                println!("  4. Run export: scribe export --events room.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Scribe Configuration File
# Matrix room export to self-contained HTML archives

[application]
log_level = "info"

[homeserver]
base_url = "https://matrix.example.org"
access_token = "${SCRIBE_ACCESS_TOKEN}"
timeout_seconds = 60

[export]
chunk_size_bytes = 10000000
media_concurrency = 1
include_room_avatar = true
output_dir = "exports"
file_prefix = "matrix-export"

[layout]
continuation_window_secs = 300

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Scribe Configuration File
# Matrix room export to self-contained HTML archives
#
# This file contains all configuration options with examples and explanations.
# Any value can be overridden with SCRIBE_<SECTION>_<KEY> environment
# variables, e.g. SCRIBE_EXPORT_OUTPUT_DIR.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Homeserver
# ============================================================================
[homeserver]
# Base URL of the homeserver serving the media repository
base_url = "https://matrix.example.org"

# Access token for authenticated media (use environment variable)
access_token = "${SCRIBE_ACCESS_TOKEN}"

# Request timeout in seconds
timeout_seconds = 60

# ============================================================================
# Export Configuration
# ============================================================================
[export]
# Bytes per sink write. The archive is written in ceil(size / chunk) writes.
chunk_size_bytes = 10000000

# Media downloads allowed in flight ahead of the document (1-16).
# 1 resolves media strictly one event at a time.
media_concurrency = 1

# Fetch the room avatar into room.png
include_room_avatar = true

# Directory archives are written to
output_dir = "exports"

# Archive name prefix: <prefix>-<timestamp>.zip
file_prefix = "matrix-export"

# ============================================================================
# Layout
# ============================================================================
[layout]
# Consecutive messages from one sender within this many seconds are grouped
continuation_window_secs = 300

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
