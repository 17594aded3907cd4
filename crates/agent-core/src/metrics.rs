// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Agent-internal metrics capability.

use std::any::Any;

/// Records metrics about the agent itself (events captured, events dropped,
/// queue depths). Collection internals live behind this trait.
pub trait MetricsCollector: Send + Sync {
    fn increment(&self, name: &str);

    fn gauge(&self, name: &str, value: f64);

    /// Concrete-type access for inspection of injected implementations.
    fn as_any(&self) -> &dyn Any;
}

/// Collector that discards everything. The composer's default when no
/// collector is supplied.
#[derive(Debug, Default)]
pub struct NoopMetricsCollector;

impl MetricsCollector for NoopMetricsCollector {
    fn increment(&self, _name: &str) {}

    fn gauge(&self, _name: &str, _value: f64) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}
