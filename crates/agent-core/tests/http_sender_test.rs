// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use apm_agent_core::{HttpSender, HttpSenderConfig, TelemetryEvent, TelemetrySender};
use mockito::Matcher;

async fn wait_for(mock: &mockito::Mock) {
    for _ in 0..100 {
        if mock.matched_async().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_posts_ndjson_batch_with_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/intake/v2/events")
        .match_header("authorization", "Bearer s3cr3t")
        .match_header("content-type", "application/x-ndjson")
        .match_body(Matcher::Regex(
            r#""kind":"transaction","name":"GET /orders""#.to_string(),
        ))
        .with_status(202)
        .create_async()
        .await;

    let sender = HttpSender::start(HttpSenderConfig {
        server_url: server.url(),
        secret_token: Some("s3cr3t".to_string()),
        flush_interval: Duration::from_secs(60),
        max_batch_size: 2,
    })
    .unwrap();

    // Two events fill the batch and trigger an immediate flush.
    sender.send(TelemetryEvent::transaction("GET /orders", 3.2));
    sender.send(TelemetryEvent::span("db.query", 1.1));

    wait_for(&mock).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_interval_flush_omits_auth_header_without_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/intake/v2/events")
        .match_header("authorization", Matcher::Missing)
        .with_status(202)
        .create_async()
        .await;

    let sender = HttpSender::start(HttpSenderConfig {
        server_url: server.url(),
        secret_token: None,
        flush_interval: Duration::from_millis(20),
        max_batch_size: 1000,
    })
    .unwrap();

    sender.send(TelemetryEvent::span("db.query", 1.1));

    wait_for(&mock).await;
    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_flush_does_not_poison_the_sender() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/intake/v2/events")
        .with_status(503)
        .expect_at_least(2)
        .create_async()
        .await;

    let sender = HttpSender::start(HttpSenderConfig {
        server_url: server.url(),
        secret_token: None,
        flush_interval: Duration::from_secs(60),
        max_batch_size: 1,
    })
    .unwrap();

    // Each send flushes a one-event batch; a 503 on the first must not
    // stop the second from going out.
    sender.send(TelemetryEvent::transaction("first", 1.0));
    sender.send(TelemetryEvent::transaction("second", 1.0));

    wait_for(&failing).await;
    failing.assert_async().await;
}
