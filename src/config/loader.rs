//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ScribeConfig;
use super::secret_string;
use crate::domain::errors::ScribeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ScribeConfig
/// 4. Applies environment variable overrides (SCRIBE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use scribe::config::loader::load_config;
///
/// let config = load_config("scribe.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ScribeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScribeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScribeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ScribeConfig = toml::from_str(&contents)
        .map_err(|e| ScribeError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ScribeError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ScribeError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ScribeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the SCRIBE_* prefix
///
/// Variables follow the pattern `SCRIBE_<SECTION>_<KEY>`, for example
/// `SCRIBE_HOMESERVER_BASE_URL` or `SCRIBE_EXPORT_CHUNK_SIZE_BYTES`.
/// Values that fail to parse are ignored.
fn apply_env_overrides(config: &mut ScribeConfig) {
    if let Ok(val) = std::env::var("SCRIBE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("SCRIBE_HOMESERVER_BASE_URL") {
        config.homeserver.base_url = val;
    }
    if let Ok(val) = std::env::var("SCRIBE_HOMESERVER_ACCESS_TOKEN") {
        config.homeserver.access_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("SCRIBE_HOMESERVER_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.homeserver.timeout_seconds = timeout;
        }
    }

    if let Ok(val) = std::env::var("SCRIBE_EXPORT_CHUNK_SIZE_BYTES") {
        if let Ok(size) = val.parse() {
            config.export.chunk_size_bytes = size;
        }
    }
    if let Ok(val) = std::env::var("SCRIBE_EXPORT_MEDIA_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.export.media_concurrency = concurrency;
        }
    }
    if let Ok(val) = std::env::var("SCRIBE_EXPORT_INCLUDE_ROOM_AVATAR") {
        config.export.include_room_avatar = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("SCRIBE_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("SCRIBE_EXPORT_FILE_PREFIX") {
        config.export.file_prefix = val;
    }

    if let Ok(val) = std::env::var("SCRIBE_LAYOUT_CONTINUATION_WINDOW_SECS") {
        if let Ok(secs) = val.parse() {
            config.layout.continuation_window_secs = secs;
        }
    }

    if let Ok(val) = std::env::var("SCRIBE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SCRIBE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
