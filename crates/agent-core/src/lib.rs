// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Bootstrap and composition layer of an embedded telemetry agent.
//!
//! Bridges the agent's framework-agnostic logging abstraction onto the host
//! application's native logging facility, resolves raw string configuration
//! into typed settings, and assembles logger, configuration reader, metrics
//! collector and telemetry sender into one immutable [`AgentComponents`]
//! bundle the rest of the agent depends on.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod sender;
pub mod test_support;

pub use components::{AgentComponents, ComposeOptions};
pub use config::{AgentSettings, ConfigReader, RawSettings};
pub use error::AgentError;
pub use event::{TelemetryEvent, TelemetryKind};
pub use host::{HostLevel, HostSink, SinkFactory};
pub use level::{parse_level_or_default, LogLevel, ParseLevelError, DEFAULT_LOG_LEVEL};
pub use logger::{AgentLog, HostLoggerBridge};
pub use metrics::{MetricsCollector, NoopMetricsCollector};
pub use sender::{CapturingSender, HttpSender, HttpSenderConfig, TelemetrySender};
