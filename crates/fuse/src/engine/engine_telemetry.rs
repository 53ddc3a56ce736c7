// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::time::Duration;

use chime::Clock;

use super::{CircuitEngine, CircuitState, EnterResult, ExitResult};
use crate::Outcome;

/// Wrapper around a circuit engine that emits structured tracing events for
/// rejections, probes, and state transitions.
#[derive(Debug)]
pub(crate) struct EngineTelemetry<T> {
    inner: T,
    name: Cow<'static, str>,
    clock: Clock,
}

impl<T> EngineTelemetry<T> {
    pub fn new(inner: T, name: Cow<'static, str>, clock: Clock) -> Self {
        Self { inner, name, clock }
    }
}

impl<T: CircuitEngine> CircuitEngine for EngineTelemetry<T> {
    fn enter(&self) -> EnterResult {
        let enter_result = self.inner.enter();

        if matches!(enter_result, EnterResult::Rejected) {
            tracing::event!(
                name: "fuse.circuit.rejected",
                tracing::Level::WARN,
                circuit = self.name.as_ref(),
                circuit.state = CircuitState::Open.as_str(),
            );
        }

        enter_result
    }

    fn exit(&self, outcome: Outcome, elapsed: Duration) -> ExitResult {
        let exit_result = self.inner.exit(outcome, elapsed);

        match exit_result {
            ExitResult::Opened(health) => {
                tracing::event!(
                    name: "fuse.circuit.opened",
                    tracing::Level::WARN,
                    circuit = self.name.as_ref(),
                    circuit.state = CircuitState::Open.as_str(),
                    circuit.health.failure_rate = health.failure_rate(),
                    circuit.health.samples = health.samples(),
                );
            }
            ExitResult::Closed(ref stats) => {
                tracing::event!(
                    name: "fuse.circuit.closed",
                    tracing::Level::INFO,
                    circuit = self.name.as_ref(),
                    circuit.state = CircuitState::Closed.as_str(),
                    circuit.probe.result = outcome.as_str(),
                    circuit.probe.elapsed_ms = elapsed.as_millis(),
                    circuit.open.duration_ms = stats.opened_duration(self.clock.instant()).as_millis(),
                    circuit.probes = stats.probes,
                    circuit.probes.failed = stats.probes_failed,
                    circuit.rejections = stats.rejected,
                    circuit.re_opened = stats.re_opened,
                    circuit.lost_reports = stats.lost_reports,
                );
            }
            ExitResult::Reopened => {
                tracing::event!(
                    name: "fuse.circuit.reopened",
                    tracing::Level::WARN,
                    circuit = self.name.as_ref(),
                    circuit.state = CircuitState::Open.as_str(),
                    circuit.probe.result = outcome.as_str(),
                    circuit.probe.elapsed_ms = elapsed.as_millis(),
                );
            }
            ExitResult::Unchanged => {
                // No event when nothing changed; the hot path stays quiet.
            }
        }

        exit_result
    }
}
