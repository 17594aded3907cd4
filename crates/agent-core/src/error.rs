// Copyright 2026-Present the apm-agent authors
// SPDX-License-Identifier: Apache-2.0

/// Errors that can abort agent construction.
///
/// Malformed configuration values are not errors at this level; they are
/// recovered locally with documented defaults (see `config`). Only missing
/// structural dependencies are fatal to a construction attempt.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("no host sink factory was provided")]
    MissingSinkFactory,

    #[error("telemetry sender cannot start: {0}")]
    SenderStart(String),
}
