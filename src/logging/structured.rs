//! Subscriber setup for the `nbexport` binary
//!
//! Human-readable events go to stderr so stdout stays reserved for the
//! command summary. With `[logging] local_enabled = true` every event is
//! also appended as JSON to `<local_path>/nbexport.log`, rotated daily or
//! hourly.

use crate::config::LoggingConfig;
use crate::domain::{NbExportError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const LOG_FILE_NAME: &str = "nbexport.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the background file writer alive; drop it to flush
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level` when set; otherwise only `nbexport` events
/// at `level` and above are shown.
///
/// # Errors
///
/// Returns [`NbExportError::Configuration`] for an unknown level, a log
/// directory that cannot be created, or a subscriber that is already set.
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = event_filter(parse_log_level(level)?);

    let mut layers: Vec<BoxedLayer> = vec![console_layer(filter.clone())];
    let file_guard = match json_file_layer(config, filter)? {
        Some((layer, guard)) => {
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| NbExportError::Configuration(format!("Failed to install log subscriber: {e}")))?;

    tracing::debug!(
        log_level = level,
        file_logging = config.local_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn event_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("nbexport={level}")))
}

fn console_layer(filter: EnvFilter) -> BoxedLayer {
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter)
        .boxed()
}

fn json_file_layer(
    config: &LoggingConfig,
    filter: EnvFilter,
) -> Result<Option<(BoxedLayer, WorkerGuard)>> {
    if !config.local_enabled {
        return Ok(None);
    }

    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        NbExportError::Configuration(format!(
            "Cannot create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let appender = RollingFileAppender::new(
        rotation(&config.local_rotation),
        &config.local_path,
        LOG_FILE_NAME,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok(Some((layer, guard)))
}

fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        _ => Rotation::DAILY,
    }
}

/// Parses `trace`, `debug`, `info`, `warn` or `error`, ignoring case
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(NbExportError::Configuration(format!(
            "Invalid log level '{level}'. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("Debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
        assert!(parse_log_level("verbose").is_err());
        assert!(parse_log_level("").is_err());
    }

    #[test]
    fn test_rotation() {
        assert_eq!(rotation("hourly"), Rotation::HOURLY);
        assert_eq!(rotation("daily"), Rotation::DAILY);
    }

    #[test]
    fn test_file_layer_disabled() {
        let config = LoggingConfig::default();
        let layer = json_file_layer(&config, EnvFilter::new("nbexport=info")).unwrap();
        assert!(layer.is_none());
    }

    #[test]
    fn test_file_layer_creates_directory() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("nested").join("logs");
        let config = LoggingConfig {
            local_enabled: true,
            local_path: logs.to_string_lossy().into_owned(),
            local_rotation: "hourly".to_string(),
        };

        let layer = json_file_layer(&config, EnvFilter::new("nbexport=info")).unwrap();
        assert!(layer.is_some());
        assert!(logs.is_dir());
    }

    #[test]
    fn test_file_layer_unusable_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let config = LoggingConfig {
            local_enabled: true,
            local_path: file.join("logs").to_string_lossy().into_owned(),
            local_rotation: "daily".to_string(),
        };

        let err = json_file_layer(&config, EnvFilter::new("nbexport=info")).err();
        assert!(matches!(err, Some(NbExportError::Configuration(_))));
    }
}
