// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Captured telemetry events handed to a sender for dispatch.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryKind {
    Transaction,
    Span,
    Error,
}

/// One captured instrumentation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub kind: TelemetryKind,
    pub name: String,
    pub duration_ms: f64,
    /// Microseconds since the Unix epoch at capture time.
    pub timestamp_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl TelemetryEvent {
    pub fn new(kind: TelemetryKind, name: impl Into<String>, duration_ms: f64) -> Self {
        let timestamp_us = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);
        TelemetryEvent {
            kind,
            name: name.into(),
            duration_ms,
            timestamp_us,
            outcome: None,
        }
    }

    pub fn transaction(name: impl Into<String>, duration_ms: f64) -> Self {
        Self::new(TelemetryKind::Transaction, name, duration_ms)
    }

    pub fn span(name: impl Into<String>, duration_ms: f64) -> Self {
        Self::new(TelemetryKind::Span, name, duration_ms)
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_tagged_json() {
        let mut event = TelemetryEvent::transaction("GET /orders", 12.5);
        event.timestamp_us = 1_700_000_000_000_000;
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"transaction","name":"GET /orders","duration_ms":12.5,"timestamp_us":1700000000000000}"#
        );
    }

    #[test]
    fn test_outcome_is_serialized_when_present() {
        let event = TelemetryEvent::span("db.query", 1.0).with_outcome("failure");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""outcome":"failure""#));
    }
}
