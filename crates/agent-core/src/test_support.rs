// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! In-memory host facility and component factory for tests.
//!
//! No subclassing anywhere: test bundles are the same [`AgentComponents`]
//! aggregate, just composed from recording/no-op implementations.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use crate::components::{AgentComponents, ComposeOptions};
use crate::config::RawSettings;
use crate::host::{HostLevel, HostSink, SinkFactory};
use crate::metrics::MetricsCollector;

/// Host facility whose minimum enabled level can be changed at runtime,
/// for exercising the bridge's construction-time level snapshot.
pub struct TestSinkFactory {
    min_level: Arc<Mutex<HostLevel>>,
    records: Arc<Mutex<Vec<(HostLevel, String)>>>,
}

impl TestSinkFactory {
    pub fn new(min_level: HostLevel) -> Self {
        TestSinkFactory {
            min_level: Arc::new(Mutex::new(min_level)),
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reconfigure the facility after sinks were handed out, as a host
    /// application could at any time.
    pub fn set_min_level(&self, level: HostLevel) {
        #[allow(clippy::expect_used)]
        let mut min_level = self.min_level.lock().expect("lock poisoned");
        *min_level = level;
    }

    /// Entries emitted through any sink of this facility, in order.
    pub fn records(&self) -> Vec<(HostLevel, String)> {
        #[allow(clippy::expect_used)]
        let records = self.records.lock().expect("lock poisoned");
        records.clone()
    }
}

struct TestSink {
    min_level: Arc<Mutex<HostLevel>>,
    records: Arc<Mutex<Vec<(HostLevel, String)>>>,
}

impl HostSink for TestSink {
    fn min_enabled_level(&self) -> HostLevel {
        #[allow(clippy::expect_used)]
        let min_level = self.min_level.lock().expect("lock poisoned");
        *min_level
    }

    fn log(
        &self,
        level: HostLevel,
        error: Option<&(dyn Error + 'static)>,
        message: &dyn Fn() -> String,
    ) {
        let min = self.min_enabled_level();
        if min == HostLevel::Off || level == HostLevel::Off || level < min {
            return;
        }
        // Deferred-format contract: only render enabled entries.
        let mut text = message();
        if let Some(error) = error {
            text = format!("{text}: {error}");
        }
        #[allow(clippy::expect_used)]
        let mut records = self.records.lock().expect("lock poisoned");
        records.push((level, text));
    }
}

impl SinkFactory for TestSinkFactory {
    fn create_named_sink(&self, _name: &str) -> Arc<dyn HostSink> {
        Arc::new(TestSink {
            min_level: Arc::clone(&self.min_level),
            records: Arc::clone(&self.records),
        })
    }
}

/// Metrics collector that remembers everything it is given.
#[derive(Debug, Default)]
pub struct RecordingMetricsCollector {
    counts: Mutex<HashMap<String, u64>>,
    gauges: Mutex<HashMap<String, f64>>,
}

impl RecordingMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, name: &str) -> u64 {
        #[allow(clippy::expect_used)]
        let counts = self.counts.lock().expect("lock poisoned");
        counts.get(name).copied().unwrap_or(0)
    }

    pub fn gauge_value(&self, name: &str) -> Option<f64> {
        #[allow(clippy::expect_used)]
        let gauges = self.gauges.lock().expect("lock poisoned");
        gauges.get(name).copied()
    }
}

impl MetricsCollector for RecordingMetricsCollector {
    fn increment(&self, name: &str) {
        #[allow(clippy::expect_used)]
        let mut counts = self.counts.lock().expect("lock poisoned");
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }

    fn gauge(&self, name: &str, value: f64) {
        #[allow(clippy::expect_used)]
        let mut gauges = self.gauges.lock().expect("lock poisoned");
        gauges.insert(name.to_string(), value);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Build a complete component bundle on top of an in-memory host facility,
/// with the composer's no-op/in-memory defaults.
#[allow(clippy::expect_used)]
pub fn components(raw: &RawSettings) -> AgentComponents {
    let factory = TestSinkFactory::new(HostLevel::Debug);
    AgentComponents::from_raw(Some(&factory), raw, ComposeOptions::default())
        .expect("test components")
}

/// Like [`components`], but keeps the factory around so the test can
/// inspect emitted entries or reconfigure the facility.
#[allow(clippy::expect_used)]
pub fn components_with_factory(
    raw: &RawSettings,
    min_level: HostLevel,
) -> (AgentComponents, TestSinkFactory) {
    let factory = TestSinkFactory::new(min_level);
    let components = AgentComponents::from_raw(Some(&factory), raw, ComposeOptions::default())
        .expect("test components");
    (components, factory)
}
