// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Raw-string configuration and its typed resolution.
//!
//! Every setting has a documented default. Malformed values never propagate
//! as errors: the default is substituted and a diagnostic is buffered, then
//! replayed through the resolved logger once one exists. This keeps the
//! bootstrap path total even though the log level itself must be parsed
//! before any logger is available to complain to.

use std::env;
use std::sync::Arc;

use crate::level::{parse_level_or_default, LogLevel, DEFAULT_LOG_LEVEL};
use crate::logger::AgentLog;

pub const ENV_LOG_LEVEL: &str = "APM_LOG_LEVEL";
pub const ENV_SERVER_URL: &str = "APM_SERVER_URL";
pub const ENV_SECRET_TOKEN: &str = "APM_SECRET_TOKEN";
pub const ENV_CAPTURE_HEADERS: &str = "APM_CAPTURE_HEADERS";
pub const ENV_TRANSACTION_SAMPLE_RATE: &str = "APM_TRANSACTION_SAMPLE_RATE";
pub const ENV_STACK_TRACE_LIMIT: &str = "APM_STACK_TRACE_LIMIT";
pub const ENV_SPAN_FRAMES_MIN_DURATION_MS: &str = "APM_SPAN_FRAMES_MIN_DURATION_MS";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8200";
pub const DEFAULT_CAPTURE_HEADERS: bool = true;
pub const DEFAULT_TRANSACTION_SAMPLE_RATE: f64 = 1.0;
pub const DEFAULT_STACK_TRACE_LIMIT: i64 = 50;
pub const DEFAULT_SPAN_FRAMES_MIN_DURATION_MS: f64 = 5.0;

/// Raw string settings as read from the environment or supplied explicitly.
///
/// This is the agent's view of the host's configuration source: a mapping of
/// setting name to raw string, with `None` standing for a missing key.
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub log_level: Option<String>,
    pub server_url: Option<String>,
    pub secret_token: Option<String>,
    pub capture_headers: Option<String>,
    pub transaction_sample_rate: Option<String>,
    pub stack_trace_limit: Option<String>,
    pub span_frames_min_duration_ms: Option<String>,
}

impl RawSettings {
    /// Read all recognized settings from `APM_*` environment variables.
    pub fn from_env() -> Self {
        RawSettings {
            log_level: env::var(ENV_LOG_LEVEL).ok(),
            server_url: env::var(ENV_SERVER_URL).ok(),
            secret_token: env::var(ENV_SECRET_TOKEN).ok(),
            capture_headers: env::var(ENV_CAPTURE_HEADERS).ok(),
            transaction_sample_rate: env::var(ENV_TRANSACTION_SAMPLE_RATE).ok(),
            stack_trace_limit: env::var(ENV_STACK_TRACE_LIMIT).ok(),
            span_frames_min_duration_ms: env::var(ENV_SPAN_FRAMES_MIN_DURATION_MS).ok(),
        }
    }
}

/// Typed, fully resolved agent settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Default [`DEFAULT_LOG_LEVEL`].
    pub log_level: LogLevel,
    /// Telemetry intake base URL. Default [`DEFAULT_SERVER_URL`].
    pub server_url: String,
    /// Bearer token for the intake endpoint. Default none.
    pub secret_token: Option<String>,
    /// Whether to capture request/response headers. Default true.
    pub capture_headers: bool,
    /// Fraction of transactions to sample, clamped to [0, 1]. Default 1.0.
    pub transaction_sample_rate: f64,
    /// Maximum stack frames to collect; negative means unlimited. Default 50.
    pub stack_trace_limit: i64,
    /// Spans shorter than this get no stack trace; negative means always
    /// collect. Default 5 ms.
    pub span_frames_min_duration_ms: f64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        AgentSettings {
            log_level: DEFAULT_LOG_LEVEL,
            server_url: DEFAULT_SERVER_URL.to_string(),
            secret_token: None,
            capture_headers: DEFAULT_CAPTURE_HEADERS,
            transaction_sample_rate: DEFAULT_TRANSACTION_SAMPLE_RATE,
            stack_trace_limit: DEFAULT_STACK_TRACE_LIMIT,
            span_frames_min_duration_ms: DEFAULT_SPAN_FRAMES_MIN_DURATION_MS,
        }
    }
}

/// Resolve raw settings into typed values plus the diagnostics for every
/// fallback substitution performed along the way.
///
/// Pure and total by construction: this runs before any logger exists.
pub fn resolve(raw: &RawSettings) -> (AgentSettings, Vec<String>) {
    let mut notes = Vec::new();

    let log_level = match raw.log_level.as_deref() {
        Some(value) if value.parse::<LogLevel>().is_err() => {
            notes.push(format!(
                "{ENV_LOG_LEVEL}: unrecognized value {value:?}, using {DEFAULT_LOG_LEVEL}"
            ));
            DEFAULT_LOG_LEVEL
        }
        other => parse_level_or_default(other),
    };

    let server_url = match raw.server_url.as_deref().map(str::trim) {
        None => DEFAULT_SERVER_URL.to_string(),
        Some("") => {
            notes.push(format!(
                "{ENV_SERVER_URL}: empty value, using {DEFAULT_SERVER_URL}"
            ));
            DEFAULT_SERVER_URL.to_string()
        }
        Some(url) => url.trim_end_matches('/').to_string(),
    };

    let secret_token = raw
        .secret_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let capture_headers = parse_or_note(
        raw.capture_headers.as_deref(),
        ENV_CAPTURE_HEADERS,
        DEFAULT_CAPTURE_HEADERS,
        &mut notes,
        |s| s.to_ascii_lowercase().parse::<bool>().ok(),
    );

    let mut transaction_sample_rate = parse_or_note(
        raw.transaction_sample_rate.as_deref(),
        ENV_TRANSACTION_SAMPLE_RATE,
        DEFAULT_TRANSACTION_SAMPLE_RATE,
        &mut notes,
        |s| s.parse::<f64>().ok().filter(|r| r.is_finite()),
    );
    if !(0.0..=1.0).contains(&transaction_sample_rate) {
        notes.push(format!(
            "{ENV_TRANSACTION_SAMPLE_RATE}: {transaction_sample_rate} is out of [0, 1], clamping"
        ));
        transaction_sample_rate = transaction_sample_rate.clamp(0.0, 1.0);
    }

    let stack_trace_limit = parse_or_note(
        raw.stack_trace_limit.as_deref(),
        ENV_STACK_TRACE_LIMIT,
        DEFAULT_STACK_TRACE_LIMIT,
        &mut notes,
        |s| s.parse::<i64>().ok(),
    );

    let span_frames_min_duration_ms = parse_or_note(
        raw.span_frames_min_duration_ms.as_deref(),
        ENV_SPAN_FRAMES_MIN_DURATION_MS,
        DEFAULT_SPAN_FRAMES_MIN_DURATION_MS,
        &mut notes,
        |s| s.parse::<f64>().ok().filter(|d| d.is_finite()),
    );

    let settings = AgentSettings {
        log_level,
        server_url,
        secret_token,
        capture_headers,
        transaction_sample_rate,
        stack_trace_limit,
        span_frames_min_duration_ms,
    };
    (settings, notes)
}

fn parse_or_note<T: Copy + std::fmt::Display>(
    raw: Option<&str>,
    key: &str,
    default: T,
    notes: &mut Vec<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    match raw.map(str::trim) {
        None => default,
        Some(value) => match parse(value) {
            Some(parsed) => parsed,
            None => {
                notes.push(format!(
                    "{key}: unrecognized value {value:?}, using {default}"
                ));
                default
            }
        },
    }
}

/// Typed settings accessor carrying the agent's resolved logger.
///
/// Construction replays every buffered fallback diagnostic through the
/// logger at warning level, so substitutions made before a sink existed are
/// reported rather than silently lost.
pub struct ConfigReader {
    logger: Arc<dyn AgentLog>,
    settings: AgentSettings,
}

impl ConfigReader {
    pub fn new(logger: Arc<dyn AgentLog>, raw: &RawSettings) -> Self {
        let (settings, notes) = resolve(raw);
        for note in &notes {
            logger.log(LogLevel::Warning, None, &|| note.clone());
        }
        ConfigReader { logger, settings }
    }

    pub fn logger(&self) -> Arc<dyn AgentLog> {
        Arc::clone(&self.logger)
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn log_level(&self) -> LogLevel {
        self.settings.log_level
    }

    pub fn server_url(&self) -> &str {
        &self.settings.server_url
    }

    pub fn secret_token(&self) -> Option<&str> {
        self.settings.secret_token.as_deref()
    }
}
