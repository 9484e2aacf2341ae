//! Support for structured logging.
//!
//! Library code only ever emits `tracing` events. Whoever embeds us decides
//! whether to install a subscriber, and can use [`init_logging`] to get ours.

use std::{fmt, io::stderr, str::FromStr};

use tracing_subscriber::EnvFilter;

use crate::common::*;

/// What log format we should use.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Indented,
    /// Single-line log entries with all fields on each line.
    Flat,
    /// JSON records.
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indented" => Ok(LogFormat::Indented),
            "flat" => Ok(LogFormat::Flat),
            "json" => Ok(LogFormat::Json),
            _ => Err(format_err!("unknown log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Indented => "indented".fmt(f),
            LogFormat::Flat => "flat".fmt(f),
            LogFormat::Json => "json".fmt(f),
        }
    }
}

/// Build our log filter from `RUST_LOG`, showing warnings by default so that
/// deprecation notices reach the user.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a global `tracing` subscriber writing to standard error.
///
/// Returns `false` if a global subscriber was already installed, in which case
/// we leave it alone.
pub fn init_logging(format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(stderr);
    let result = match format {
        LogFormat::Indented => builder.compact().try_init(),
        LogFormat::Flat => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    match result {
        Ok(()) => {
            debug!("logging to stderr as {}", format);
            true
        }
        Err(_) => false,
    }
}

#[test]
fn log_format_round_trips() {
    for format in [LogFormat::Indented, LogFormat::Flat, LogFormat::Json] {
        assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
    }
    assert!("yaml".parse::<LogFormat>().is_err());
}

#[test]
fn second_init_is_refused() {
    init_logging(LogFormat::Flat);
    assert!(!init_logging(LogFormat::Json));
}
