// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Bridge between the agent's log abstraction and the host facility.

use std::error::Error;
use std::sync::Arc;

use crate::error::AgentError;
use crate::host::{HostSink, SinkFactory};
use crate::level::LogLevel;

/// Name under which the agent asks the host facility for its sink.
pub const SINK_NAME: &str = "apm-agent";

/// Leveled log sink consumed by the rest of the agent.
///
/// `message` is a deferred formatter: implementations invoke it only when
/// the entry will actually be emitted.
pub trait AgentLog: Send + Sync {
    /// The effective minimum level of this logger.
    fn level(&self) -> LogLevel;

    fn log(
        &self,
        level: LogLevel,
        error: Option<&(dyn Error + 'static)>,
        message: &dyn Fn() -> String,
    );
}

/// [`AgentLog`] implementation backed by a host-native sink.
///
/// The host's minimum enabled level is queried once at construction and
/// cached for the lifetime of the bridge. If the host facility is
/// reconfigured afterwards the cached value goes stale; that staleness is
/// deliberate, the bridge is built exactly once at startup.
pub struct HostLoggerBridge {
    sink: Arc<dyn HostSink>,
    level: LogLevel,
}

impl HostLoggerBridge {
    /// Create the named sink and snapshot its enabled level.
    ///
    /// Fails immediately with [`AgentError::MissingSinkFactory`] when no
    /// factory is available; this is not deferred to the first log call.
    pub fn new(factory: Option<&dyn SinkFactory>) -> Result<Self, AgentError> {
        let factory = factory.ok_or(AgentError::MissingSinkFactory)?;
        let sink = factory.create_named_sink(SINK_NAME);
        let level = LogLevel::from_host_level(sink.min_enabled_level());
        Ok(HostLoggerBridge { sink, level })
    }
}

impl std::fmt::Debug for HostLoggerBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostLoggerBridge")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl AgentLog for HostLoggerBridge {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn log(
        &self,
        level: LogLevel,
        error: Option<&(dyn Error + 'static)>,
        message: &dyn Fn() -> String,
    ) {
        // The sink owns the enabled check and the deferred-format contract.
        self.sink.log(level.to_host_level(), error, message);
    }
}
