// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Host logging backend for applications that log through the `tracing`
//! ecosystem.
//!
//! [`TracingSinkFactory`] satisfies the agent's three-operation host
//! facility surface: named sinks emit `tracing` events at the translated
//! level, and the minimum enabled level is derived from the subscriber's
//! global max-level hint. `tracing` has no `critical` severity, so critical
//! entries collapse to `error` with a `critical = true` field; that
//! collapse is a property of this backend, not of the agent's level bridge.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use std::error::Error;
use std::sync::Arc;

use apm_agent_core::host::{HostLevel, HostSink, SinkFactory};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, trace, warn, Level};

/// Sink factory backed by the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSinkFactory;

impl TracingSinkFactory {
    pub fn new() -> Self {
        TracingSinkFactory
    }
}

impl SinkFactory for TracingSinkFactory {
    fn create_named_sink(&self, name: &str) -> Arc<dyn HostSink> {
        Arc::new(TracingSink {
            name: name.to_string(),
        })
    }
}

struct TracingSink {
    name: String,
}

impl HostSink for TracingSink {
    fn min_enabled_level(&self) -> HostLevel {
        host_level_from_filter(LevelFilter::current())
    }

    fn log(
        &self,
        level: HostLevel,
        error: Option<&(dyn Error + 'static)>,
        message: &dyn Fn() -> String,
    ) {
        let Some(native) = native_level(level) else {
            return;
        };
        // Gate on the subscriber's max-level hint before rendering, so
        // disabled entries never pay for formatting.
        if native > LevelFilter::current() {
            return;
        }
        let text = match error {
            Some(error) => format!("{}: {error}", message()),
            None => message(),
        };
        match level {
            HostLevel::Critical => error!(sink = %self.name, critical = true, "{text}"),
            HostLevel::Error => error!(sink = %self.name, "{text}"),
            HostLevel::Warn => warn!(sink = %self.name, "{text}"),
            HostLevel::Info => info!(sink = %self.name, "{text}"),
            HostLevel::Debug => debug!(sink = %self.name, "{text}"),
            HostLevel::Trace => trace!(sink = %self.name, "{text}"),
            HostLevel::Off => {}
        }
    }
}

fn native_level(level: HostLevel) -> Option<Level> {
    match level {
        HostLevel::Trace => Some(Level::TRACE),
        HostLevel::Debug => Some(Level::DEBUG),
        HostLevel::Info => Some(Level::INFO),
        HostLevel::Warn => Some(Level::WARN),
        HostLevel::Error | HostLevel::Critical => Some(Level::ERROR),
        HostLevel::Off => None,
    }
}

fn host_level_from_filter(filter: LevelFilter) -> HostLevel {
    match filter.into_level() {
        None => HostLevel::Off,
        Some(level) => {
            if level == Level::TRACE {
                HostLevel::Trace
            } else if level == Level::DEBUG {
                HostLevel::Debug
            } else if level == Level::INFO {
                HostLevel::Info
            } else if level == Level::WARN {
                HostLevel::Warn
            } else {
                HostLevel::Error
            }
        }
    }
}
