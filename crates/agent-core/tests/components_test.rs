// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::sync::Arc;

use apm_agent_core::config::{ENV_LOG_LEVEL, ENV_SECRET_TOKEN};
use apm_agent_core::test_support::{
    components, components_with_factory, RecordingMetricsCollector, TestSinkFactory,
};
use apm_agent_core::{
    AgentComponents, AgentError, CapturingSender, ComposeOptions, HostLevel, LogLevel, RawSettings,
    TelemetryEvent, DEFAULT_LOG_LEVEL,
};
use serial_test::serial;

#[test]
fn test_compose_defaults_to_noop_metrics_and_capturing_sender() {
    let bundle = components(&RawSettings::default());

    assert!(bundle
        .metrics()
        .as_any()
        .downcast_ref::<apm_agent_core::NoopMetricsCollector>()
        .is_some());
    assert!(bundle
        .sender()
        .as_any()
        .downcast_ref::<CapturingSender>()
        .is_some());
}

#[test]
fn test_default_sender_buffers_for_inspection() {
    let bundle = components(&RawSettings::default());
    bundle.sender().send(TelemetryEvent::transaction("GET /", 0.4));

    let capturing = bundle
        .sender()
        .as_any()
        .downcast_ref::<CapturingSender>()
        .unwrap();
    let captured = capturing.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].name, "GET /");
}

#[test]
fn test_injected_capabilities_are_kept() {
    let metrics = Arc::new(RecordingMetricsCollector::new());
    let sender = Arc::new(CapturingSender::new());
    let factory = TestSinkFactory::new(HostLevel::Info);

    let bundle = AgentComponents::from_raw(
        Some(&factory),
        &RawSettings::default(),
        ComposeOptions {
            metrics: Some(metrics.clone()),
            sender: Some(sender.clone()),
        },
    )
    .unwrap();

    bundle.metrics().increment("agent.events.captured");
    bundle.sender().send(TelemetryEvent::span("db.query", 1.0));

    assert_eq!(metrics.count("agent.events.captured"), 1);
    assert_eq!(sender.captured().len(), 1);
}

#[test]
fn test_missing_sink_factory_fails_before_composition() {
    let result = AgentComponents::from_raw(None, &RawSettings::default(), ComposeOptions::default());
    assert!(matches!(result, Err(AgentError::MissingSinkFactory)));
}

#[test]
fn test_identical_configuration_yields_identical_cached_levels() {
    let (first, first_factory) = components_with_factory(&RawSettings::default(), HostLevel::Warn);
    let (second, second_factory) =
        components_with_factory(&RawSettings::default(), HostLevel::Warn);

    assert_eq!(first.logger().level(), second.logger().level());
    assert_eq!(first.logger().level(), LogLevel::Warning);

    // Host-side reconfiguration after construction is deliberately not
    // observed; the bridge keeps its startup snapshot.
    first_factory.set_min_level(HostLevel::Trace);
    second_factory.set_min_level(HostLevel::Off);
    assert_eq!(first.logger().level(), LogLevel::Warning);
    assert_eq!(second.logger().level(), LogLevel::Warning);
}

#[test]
fn test_invalid_level_is_replayed_once_a_sink_exists() {
    let raw = RawSettings {
        log_level: Some("not-a-level".to_string()),
        ..Default::default()
    };
    let (bundle, factory) = components_with_factory(&raw, HostLevel::Debug);

    assert_eq!(bundle.config().log_level(), DEFAULT_LOG_LEVEL);
    let records = factory.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, HostLevel::Warn);
    assert!(records[0].1.contains("not-a-level"));
}

#[test]
fn test_reader_settings_are_reachable_from_the_bundle() {
    let raw = RawSettings {
        server_url: Some("https://apm.example.com".to_string()),
        secret_token: Some("s3cr3t".to_string()),
        transaction_sample_rate: Some("0.5".to_string()),
        ..Default::default()
    };
    let bundle = components(&raw);

    assert_eq!(bundle.config().server_url(), "https://apm.example.com");
    assert_eq!(bundle.config().secret_token(), Some("s3cr3t"));
    assert_eq!(bundle.config().settings().transaction_sample_rate, 0.5);
}

#[test]
#[serial]
fn test_from_env_builds_a_complete_bundle() {
    env::set_var(ENV_LOG_LEVEL, "debug");
    env::set_var(ENV_SECRET_TOKEN, "env-token");

    let factory = TestSinkFactory::new(HostLevel::Info);
    let bundle = AgentComponents::from_env(Some(&factory), ComposeOptions::default()).unwrap();

    assert_eq!(bundle.config().log_level(), LogLevel::Debug);
    assert_eq!(bundle.config().secret_token(), Some("env-token"));
    assert_eq!(bundle.logger().level(), LogLevel::Info);

    env::remove_var(ENV_LOG_LEVEL);
    env::remove_var(ENV_SECRET_TOKEN);
}
