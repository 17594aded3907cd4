// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

//! Telemetry senders: the capability that accepts captured events for
//! asynchronous dispatch.
//!
//! `send` is a synchronous enqueue and never blocks the instrumented
//! request path. The capturing variant buffers in memory for inspection;
//! the HTTP variant feeds a background flusher task that batches events and
//! ships them to the intake endpoint.

use std::any::Any;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::event::TelemetryEvent;

const INTAKE_PATH: &str = "/intake/v2/events";
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(3);
const DEFAULT_MAX_BATCH_SIZE: usize = 256;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub trait TelemetrySender: Send + Sync {
    /// Accept one captured event. Must not block.
    fn send(&self, event: TelemetryEvent);

    /// Concrete-type access for inspection of injected implementations.
    fn as_any(&self) -> &dyn Any;
}

/// Sender that buffers events in memory instead of transmitting them.
///
/// The composer's default when no sender is supplied; intended for tests
/// and inspection scenarios. Production callers supply an [`HttpSender`].
#[derive(Debug, Default)]
pub struct CapturingSender {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl CapturingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, in order.
    pub fn captured(&self) -> Vec<TelemetryEvent> {
        #[allow(clippy::expect_used)]
        let events = self.events.lock().expect("lock poisoned");
        events.clone()
    }
}

impl TelemetrySender for CapturingSender {
    fn send(&self, event: TelemetryEvent) {
        #[allow(clippy::expect_used)]
        let mut events = self.events.lock().expect("lock poisoned");
        events.push(event);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct HttpSenderConfig {
    pub server_url: String,
    pub secret_token: Option<String>,
    pub flush_interval: Duration,
    pub max_batch_size: usize,
}

impl HttpSenderConfig {
    pub fn from_settings(settings: &AgentSettings) -> Self {
        HttpSenderConfig {
            server_url: settings.server_url.clone(),
            secret_token: settings.secret_token.clone(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

/// Network-backed sender posting newline-delimited JSON batches to the
/// intake endpoint.
///
/// Events are enqueued on an unbounded channel and flushed by a spawned
/// task, either when the batch fills up or on the flush interval. Failed
/// batches are dropped and logged; telemetry delivery is best effort and
/// never feeds back into the instrumented application.
#[derive(Debug)]
pub struct HttpSender {
    tx: mpsc::UnboundedSender<TelemetryEvent>,
}

impl HttpSender {
    /// Spawn the flusher on the current tokio runtime.
    ///
    /// Fails when called outside a runtime; this is a structural
    /// misconfiguration, reported immediately rather than on first send.
    pub fn start(config: HttpSenderConfig) -> Result<Self, AgentError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| AgentError::SenderStart(e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run_flusher(config, rx));
        Ok(HttpSender { tx })
    }
}

impl TelemetrySender for HttpSender {
    fn send(&self, event: TelemetryEvent) {
        if self.tx.send(event).is_err() {
            debug!("Telemetry flusher has stopped, dropping event");
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

async fn run_flusher(config: HttpSenderConfig, mut rx: mpsc::UnboundedReceiver<TelemetryEvent>) {
    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create telemetry HTTP client: {e:?}");
            return;
        }
    };
    let intake_url = format!("{}{INTAKE_PATH}", config.server_url.trim_end_matches('/'));
    debug!("Telemetry flusher started for {intake_url}");

    let mut batch: Vec<TelemetryEvent> = Vec::new();
    let mut ticker = tokio::time::interval(config.flush_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(event) => {
                    batch.push(event);
                    if batch.len() >= config.max_batch_size {
                        flush_batch(&client, &intake_url, config.secret_token.as_deref(), &mut batch).await;
                    }
                }
                None => {
                    // Sender dropped: flush what is left and stop.
                    flush_batch(&client, &intake_url, config.secret_token.as_deref(), &mut batch).await;
                    break;
                }
            },
            _ = ticker.tick() => {
                flush_batch(&client, &intake_url, config.secret_token.as_deref(), &mut batch).await;
            }
        }
    }
    debug!("Telemetry flusher stopped");
}

async fn flush_batch(
    client: &reqwest::Client,
    intake_url: &str,
    secret_token: Option<&str>,
    batch: &mut Vec<TelemetryEvent>,
) {
    if batch.is_empty() {
        return;
    }
    debug!("Flushing {} telemetry events", batch.len());

    let mut body = String::new();
    for event in batch.drain(..) {
        match serde_json::to_string(&event) {
            Ok(line) => {
                body.push_str(&line);
                body.push('\n');
            }
            Err(e) => error!("Failed to serialize telemetry event: {e:?}"),
        }
    }

    let mut request = client
        .post(intake_url)
        .header("Content-Type", "application/x-ndjson")
        .body(body);
    if let Some(token) = secret_token {
        request = request.bearer_auth(token);
    }

    match request.send().await {
        Ok(response) if response.status().is_success() => {
            debug!("Successfully flushed telemetry events")
        }
        Ok(response) => error!("Telemetry intake returned {}", response.status()),
        Err(e) => error!("Error sending telemetry events: {e:?}"),
    }
}
