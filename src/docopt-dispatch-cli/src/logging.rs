//! Log setup for the demo binary.

use std::io::IsTerminal;

/// Environment variable selecting the log level.
pub const LOG_LEVEL_ENV: &str = "DOCOPT_DISPATCH_LOG_LEVEL";

/// Log level for the demo binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Install the stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level comes from
/// [`LOG_LEVEL_ENV`], falling back to warnings.
pub fn init() {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => tracing_subscriber::EnvFilter::new(directives),
        Err(_) => {
            let level = std::env::var(LOG_LEVEL_ENV)
                .ok()
                .and_then(|s| LogLevel::from_str_loose(&s))
                .unwrap_or_default();
            tracing_subscriber::EnvFilter::new(level.as_filter_str())
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}
