//! Subscriber setup
//!
//! Human-readable lines always go to stderr so stdout stays free for the
//! export summary. With `logging.local_enabled` a second, JSON formatted
//! layer writes `scribe.log` under `logging.local_path` through a
//! non-blocking rolling appender.

use crate::config::LoggingConfig;
use crate::domain::{Result, ScribeError};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_NAME: &str = "scribe.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Flushes buffered file output when dropped; hold it until `main` returns.
pub struct LoggingGuard(Option<WorkerGuard>);

impl LoggingGuard {
    /// Whether a log file is being written
    pub fn writes_file(&self) -> bool {
        self.0.is_some()
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG`, when set, replaces the `scribe=<level>` default filter.
///
/// # Errors
///
/// [`ScribeError::Configuration`] for an unknown level or rotation, or a log
/// directory that cannot be created. Calling this twice in one process panics
/// inside `tracing_subscriber`.
///
/// ```no_run
/// use scribe::config::LoggingConfig;
/// use scribe::logging::init_logging;
///
/// let _guard = init_logging("debug", &LoggingConfig::default()).expect("logging");
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = level_from_name(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scribe={level}")));

    let mut layers: Vec<BoxedLayer> = vec![stderr_layer(filter.clone())];
    let file_guard = if config.local_enabled {
        let (layer, guard) = file_layer(config, filter)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();
    tracing::debug!(
        log_file = config.local_enabled,
        log_dir = %config.local_path,
        rotation = %config.local_rotation,
        "Logging ready"
    );

    Ok(LoggingGuard(file_guard))
}

fn stderr_layer(filter: EnvFilter) -> BoxedLayer {
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter)
        .boxed()
}

fn file_layer(config: &LoggingConfig, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard)> {
    let rotation = rotation_from_name(&config.local_rotation)?;
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        ScribeError::Configuration(format!(
            "cannot create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let appender = RollingFileAppender::new(rotation, &config.local_path, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(writer)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter)
        .boxed();

    Ok((layer, guard))
}

fn level_from_name(name: &str) -> Result<Level> {
    const LEVELS: [(&str, Level); 5] = [
        ("error", Level::ERROR),
        ("warn", Level::WARN),
        ("info", Level::INFO),
        ("debug", Level::DEBUG),
        ("trace", Level::TRACE),
    ];

    LEVELS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|(_, level)| *level)
        .ok_or_else(|| {
            ScribeError::Configuration(format!(
                "unknown log level '{name}' (expected error, warn, info, debug or trace)"
            ))
        })
}

fn rotation_from_name(name: &str) -> Result<Rotation> {
    match name {
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        "never" => Ok(Rotation::NEVER),
        other => Err(ScribeError::Configuration(format!(
            "unknown log rotation '{other}' (expected hourly, daily or never)"
        ))),
    }
}
