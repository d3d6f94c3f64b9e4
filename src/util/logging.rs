//! Structured logging setup for cifix
//!
//! By default every event is written as one JSON object per line:
//!
//! ```text
//! {"timestamp":"...","level":"INFO","message":"Parsed CI log","correlation_id":"...","signals":3,"target":"cifix::orchestrator"}
//! ```
//!
//! `ERROR` events go to stderr, everything else to stdout. Callers attach the
//! invocation's `correlation_id` as a field on each event.
//!
//! # Example
//!
//! ```no_run
//! use cifix::util::logging;
//! use tracing::info;
//!
//! logging::init_from_env();
//! info!(correlation_id = "abc", "Application started");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for cifix events
    pub level: Level,

    /// JSON lines (default) or human-readable console output
    pub use_json: bool,

    /// Include the module target (e.g., cifix::orchestrator) in logs
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Human-readable output at debug level
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            use_json: false,
            include_target: true,
        }
    }
}

/// Parses a log level from a string
///
/// # Example
///
/// ```
/// use cifix::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    let mut directives = vec![format!("cifix={}", level)];

    if env::var("RUST_LOG").is_err() {
        directives.extend(["h2=warn", "hyper=warn", "reqwest=warn"].map(String::from));
    }

    for directive in directives {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Initializes the logging system. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);
        let writer = std::io::stderr
            .with_max_level(Level::ERROR)
            .or_else(std::io::stdout);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(false)
                        .with_span_list(false)
                        .with_target(config.include_target)
                        .with_writer(writer),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_writer(writer),
                )
                .init();
        }
    });
}

/// Initializes logging from `CIFIX_LOG_LEVEL` (default "info") and
/// `CIFIX_LOG_JSON` (default "true"); `RUST_LOG` still applies.
pub fn init_from_env() {
    let level_str = env::var("CIFIX_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let use_json = env::var("CIFIX_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(true);

    init_logging(LoggingConfig {
        level: parse_level(&level_str),
        use_json,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("loud"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_default_config_is_json() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(config.use_json);
        assert!(config.include_target);
    }

    #[test]
    fn test_development_config() {
        let config = LoggingConfig::development();
        assert_eq!(config.level, Level::DEBUG);
        assert!(!config.use_json);
        assert_eq!(LoggingConfig::with_level(Level::WARN).level, Level::WARN);
    }
}
