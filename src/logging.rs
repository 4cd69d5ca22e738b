//! Logging initialization
//!
//! Uses the tracing ecosystem for structured logging with support for:
//! - Environment variable override (`TASKLINK_LOG`)
//! - Console output in pretty/compact/json formats
//! - Optional file output with daily rotation

use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LoggingSettings;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Parse log level from string
pub fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Get the default log directory path
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasklink")
        .join("logs")
}

/// Initialize the logging system
///
/// # Environment Variables
/// - `TASKLINK_LOG`: Override the filter (e.g. "tasklink=debug,tasklink::api=trace")
pub fn init_logging(settings: &LoggingSettings) {
    let level = parse_level(&settings.level);
    let env_filter = EnvFilter::try_from_env("TASKLINK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!("tasklink={}", level.as_str().to_lowercase()))
    });

    let console_layer = match LogFormat::parse(&settings.format) {
        LogFormat::Json => fmt::layer().json().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
        LogFormat::Pretty => fmt::layer().with_target(true).with_ansi(true).boxed(),
    };

    let file_layer = if settings.file_output {
        let log_dir = settings.file_path.clone().unwrap_or_else(default_log_dir);
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("Warning: Failed to create log directory {log_dir:?}: {e}");
            None
        } else {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "tasklink.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_ansi(false)
                    .boxed(),
            )
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::debug!(
        level = %settings.level,
        format = %settings.format,
        file_output = settings.file_output,
        "Logging initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("unknown"), Level::INFO);
    }
}
