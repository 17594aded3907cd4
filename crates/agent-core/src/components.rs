// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Composition of the agent's runtime context.
//!
//! All construction paths converge on [`AgentComponents::compose`], the one
//! place where the aggregate is assembled and its defaults applied. The
//! convenience paths only build the missing dependencies and delegate; none
//! of them can observe or produce a partially constructed aggregate.

use std::sync::Arc;

use crate::config::{ConfigReader, RawSettings};
use crate::error::AgentError;
use crate::host::SinkFactory;
use crate::logger::{AgentLog, HostLoggerBridge};
use crate::metrics::{MetricsCollector, NoopMetricsCollector};
use crate::sender::{CapturingSender, TelemetrySender};

/// Optional capabilities for [`AgentComponents::compose`], each with a
/// documented default.
///
/// `metrics` defaults to [`NoopMetricsCollector`]; `sender` defaults to the
/// in-memory [`CapturingSender`]. Production deployments supply a real
/// network-backed sender explicitly (see `HttpSender`).
#[derive(Default)]
pub struct ComposeOptions {
    pub metrics: Option<Arc<dyn MetricsCollector>>,
    pub sender: Option<Arc<dyn TelemetrySender>>,
}

/// Immutable aggregate of one running agent instance.
///
/// Built exactly once at host startup, then shared read-only across request
/// threads. There is no mutation API and no teardown; shutdown is the
/// host's concern.
pub struct AgentComponents {
    logger: Arc<dyn AgentLog>,
    config: Arc<ConfigReader>,
    metrics: Arc<dyn MetricsCollector>,
    sender: Arc<dyn TelemetrySender>,
}

impl AgentComponents {
    /// Canonical construction path. Every other path terminates here.
    ///
    /// The reader already carries its resolved logger, so with the defaults
    /// applied all four capabilities are present the moment this returns;
    /// the aggregate is never observable in a partially built state.
    pub fn compose(config: Arc<ConfigReader>, options: ComposeOptions) -> AgentComponents {
        let logger = config.logger();
        let metrics = options
            .metrics
            .unwrap_or_else(|| Arc::new(NoopMetricsCollector));
        let sender = options
            .sender
            .unwrap_or_else(|| Arc::new(CapturingSender::new()));
        AgentComponents {
            logger,
            config,
            metrics,
            sender,
        }
    }

    /// Build from raw string settings: bridge the host facility, resolve
    /// the settings into a reader, then delegate to [`Self::compose`].
    ///
    /// The log level inside `raw` is parsed by the total, logger-free
    /// parser; any fallback is replayed through the bridge once it exists.
    pub fn from_raw(
        factory: Option<&dyn SinkFactory>,
        raw: &RawSettings,
        options: ComposeOptions,
    ) -> Result<AgentComponents, AgentError> {
        let logger: Arc<dyn AgentLog> = Arc::new(HostLoggerBridge::new(factory)?);
        let config = Arc::new(ConfigReader::new(logger, raw));
        Ok(Self::compose(config, options))
    }

    /// Build from `APM_*` environment variables.
    pub fn from_env(
        factory: Option<&dyn SinkFactory>,
        options: ComposeOptions,
    ) -> Result<AgentComponents, AgentError> {
        Self::from_raw(factory, &RawSettings::from_env(), options)
    }

    pub fn logger(&self) -> &Arc<dyn AgentLog> {
        &self.logger
    }

    pub fn config(&self) -> &ConfigReader {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        &self.metrics
    }

    pub fn sender(&self) -> &Arc<dyn TelemetrySender> {
        &self.sender
    }
}
