// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! The agent's internal log severity domain.
//!
//! `LogLevel` is ordered: a sink configured at level L emits exactly the
//! entries with severity >= L. `Off` disables emission entirely and sorts
//! above every real severity.

use std::fmt;
use std::str::FromStr;

/// Severity of an agent log entry, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    /// Logging disabled. Nothing is emitted, including `Off` itself.
    Off,
}

/// Level substituted when a raw configuration value cannot be parsed and no
/// logger exists yet to report the problem to.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Error;

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Off => "off",
        };
        f.write_str(name)
    }
}

/// Error returned when a string does not name a log level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" | "information" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "off" | "none" => Ok(LogLevel::Off),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Parse a raw level string, substituting [`DEFAULT_LOG_LEVEL`] when the
/// value is missing or malformed.
///
/// This runs during bootstrap, before any logger exists, so it is total and
/// never fails; the substitution is recorded elsewhere and replayed once a
/// sink is available (see `config`).
pub fn parse_level_or_default(raw: Option<&str>) -> LogLevel {
    raw.and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_LOG_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_strict() {
        let levels = [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
            LogLevel::Critical,
            LogLevel::Off,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort below {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("Information".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("none".parse::<LogLevel>(), Ok(LogLevel::Off));
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let err = "not-a-level".parse::<LogLevel>().unwrap_err();
        assert_eq!(err, ParseLevelError("not-a-level".to_string()));
    }

    #[test]
    fn test_parse_or_default_falls_back() {
        assert_eq!(parse_level_or_default(Some("trace")), LogLevel::Trace);
        assert_eq!(parse_level_or_default(Some("not-a-level")), DEFAULT_LOG_LEVEL);
        assert_eq!(parse_level_or_default(None), DEFAULT_LOG_LEVEL);
    }
}
