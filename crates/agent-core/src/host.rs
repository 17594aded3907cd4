// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Capability surface of the host application's logging facility.
//!
//! The agent never assumes more than three operations from the host: create
//! a named sink, ask it for its minimum enabled level, and hand it a leveled
//! entry with a deferred formatter. Any concrete backend (see the
//! `apm-agent-tracing` crate for one) can be substituted behind these traits.

use std::error::Error;
use std::sync::Arc;

use crate::level::LogLevel;

/// Native severity domain of the host logging facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
    Off,
}

/// A leveled write target owned by the host facility.
///
/// The sink decides whether a level is enabled; disabled entries must be
/// dropped without invoking the formatter, so callers can pass formatters
/// that are expensive to run.
pub trait HostSink: Send + Sync {
    /// The lowest level this sink currently emits.
    fn min_enabled_level(&self) -> HostLevel;

    /// Write one entry. `message` is invoked only if `level` is enabled.
    fn log(
        &self,
        level: HostLevel,
        error: Option<&(dyn Error + 'static)>,
        message: &dyn Fn() -> String,
    );
}

/// Produces named [`HostSink`]s on behalf of the host facility.
pub trait SinkFactory: Send + Sync {
    fn create_named_sink(&self, name: &str) -> Arc<dyn HostSink>;
}

impl LogLevel {
    /// Map an agent level onto the host domain, preserving ordering.
    ///
    /// Total: `Off` maps to [`HostLevel::Off`], everything else to its
    /// distinct host counterpart. This path never fails.
    pub fn to_host_level(self) -> HostLevel {
        match self {
            LogLevel::Trace => HostLevel::Trace,
            LogLevel::Debug => HostLevel::Debug,
            LogLevel::Info => HostLevel::Info,
            LogLevel::Warning => HostLevel::Warn,
            LogLevel::Error => HostLevel::Error,
            LogLevel::Critical => HostLevel::Critical,
            LogLevel::Off => HostLevel::Off,
        }
    }

    /// Translate a host level back into the agent domain.
    pub fn from_host_level(level: HostLevel) -> LogLevel {
        match level {
            HostLevel::Trace => LogLevel::Trace,
            HostLevel::Debug => LogLevel::Debug,
            HostLevel::Info => LogLevel::Info,
            HostLevel::Warn => LogLevel::Warning,
            HostLevel::Error => LogLevel::Error,
            HostLevel::Critical => LogLevel::Critical,
            HostLevel::Off => LogLevel::Off,
        }
    }
}
