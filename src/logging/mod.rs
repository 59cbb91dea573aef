//! Structured logging setup for tilegraph
//!
//! Log output goes to stderr (or a file) so that command output on stdout,
//! including JSON, stays machine readable.

use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{
    fmt::{self, time::UtcTime, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("A log file path is required for {0:?} output")]
    FileRequired(LogOutput),
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to install the global subscriber: {0}")]
    Init(String),
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    pub file_path: Option<String>,
    /// Include source file and line numbers
    pub include_source: bool,
    /// Emit timing events from `trace_performance!` and per-vertex repair traces
    pub performance_tracing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stderr,
    File,
    Both,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "both" => Ok(LogOutput::Both),
            _ => Err(format!("Invalid log output: {}", s)),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            file_path: None,
            include_source: false,
            performance_tracing: false,
        }
    }
}

impl LogConfig {
    /// Defaults overridden by `TILEGRAPH_LOG_*` environment variables.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let flag = |value: String| value.eq_ignore_ascii_case("true");

        if let Some(level) = lookup("TILEGRAPH_LOG_LEVEL").and_then(|v| v.parse().ok()) {
            config.level = level;
        }
        if let Some(format) = lookup("TILEGRAPH_LOG_FORMAT").and_then(|v| v.parse().ok()) {
            config.format = format;
        }
        if let Some(output) = lookup("TILEGRAPH_LOG_OUTPUT").and_then(|v| v.parse().ok()) {
            config.output = output;
        }
        if let Some(file_path) = lookup("TILEGRAPH_LOG_FILE") {
            config.file_path = Some(file_path);
        }
        if let Some(include_source) = lookup("TILEGRAPH_LOG_SOURCE") {
            config.include_source = flag(include_source);
        }
        if let Some(performance) = lookup("TILEGRAPH_LOG_PERFORMANCE") {
            config.performance_tracing = flag(performance);
        }
        config
    }

    /// Raise the level to at least debug
    pub fn verbose(mut self) -> Self {
        if matches!(self.level, LogLevel::Info | LogLevel::Warn | LogLevel::Error) {
            self.level = LogLevel::Debug;
        }
        self
    }
}

/// Install the global tracing subscriber
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if matches!(config.output, LogOutput::Stderr | LogOutput::Both) {
        layers.push(formatted_layer(config, std::io::stderr, true));
    }
    if matches!(config.output, LogOutput::File | LogOutput::Both) {
        let path = config
            .file_path
            .as_deref()
            .ok_or(LoggingError::FileRequired(config.output))?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        layers.push(formatted_layer(config, Arc::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers.with_filter(create_filter(config)))
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))?;

    debug!(?config, "logging initialized");
    Ok(())
}

/// `RUST_LOG` wins over the configured level when set
fn create_filter(config: &LogConfig) -> EnvFilter {
    let mut directives = format!("tilegraph={}", config.level.as_str());
    if config.performance_tracing {
        directives.push_str(",tilegraph::services::manipulation=trace");
        directives.push_str(",tilegraph::services::manager=trace");
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

fn formatted_layer<W>(config: &LogConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(UtcTime::rfc_3339())
        .with_file(config.include_source)
        .with_line_number(config.include_source);

    match config.format {
        LogFormat::Pretty => Box::new(layer.pretty()),
        LogFormat::Compact => Box::new(layer.compact()),
        LogFormat::Json => Box::new(layer.json()),
    }
}

/// Time a block, logging its duration when it completes
#[macro_export]
macro_rules! trace_performance {
    ($name:expr, $block:block) => {{
        let span = tracing::debug_span!("performance", operation = $name);
        let _enter = span.enter();
        let start = std::time::Instant::now();

        let result = $block;

        tracing::debug!(
            operation = $name,
            duration_us = start.elapsed().as_micros() as u64,
            "performance trace"
        );
        result
    }};
}

#[cfg(test)]
pub fn init_test_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let config = LogConfig {
            level: LogLevel::Debug,
            performance_tracing: true,
            ..LogConfig::default()
        };
        // Another test binary component may already own the global subscriber
        let _ = init_logging(&config);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_log_format_and_output_parsing() {
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogOutput::from_str("Both").unwrap(), LogOutput::Both);
        assert!(LogOutput::from_str("stdout").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TILEGRAPH_LOG_LEVEL", "trace"),
            ("TILEGRAPH_LOG_FORMAT", "json"),
            ("TILEGRAPH_LOG_OUTPUT", "nowhere"),
            ("TILEGRAPH_LOG_PERFORMANCE", "TRUE"),
        ]
        .into_iter()
        .collect();

        let config = LogConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(config.performance_tracing);
        assert!(!config.include_source);
    }

    #[test]
    fn test_verbose_never_lowers_detail() {
        assert_eq!(LogConfig::default().verbose().level, LogLevel::Debug);

        let config = LogConfig {
            level: LogLevel::Trace,
            ..LogConfig::default()
        };
        assert_eq!(config.verbose().level, LogLevel::Trace);
    }

    #[test]
    fn test_file_output_requires_path() {
        let config = LogConfig {
            output: LogOutput::File,
            ..LogConfig::default()
        };
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::FileRequired(LogOutput::File))
        ));
    }

    #[test]
    fn test_performance_macro() {
        init_test_logging();

        let result = trace_performance!("test_operation", { 6 * 7 });
        assert_eq!(result, 42);
    }
}
