// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use crate::Outcome;
use crate::window::Health;

#[derive(Debug, Copy, Clone)]
pub(crate) enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

/// Result of asking the circuit to admit one request.
#[derive(Debug, Copy, Clone)]
pub(crate) enum EnterResult {
    /// The request is admitted.
    ///
    /// `probe` marks the single trial request admitted from the half-open state to
    /// test whether the downstream has recovered.
    Admitted { probe: bool },

    /// The request is rejected because the circuit is open.
    Rejected,
}

/// Result of reporting one outcome to the circuit.
#[derive(Debug, Clone)]
pub(crate) enum ExitResult {
    /// The state remains unchanged.
    Unchanged,

    /// The circuit tripped from Closed to Open.
    Opened(Health),

    /// A failed probe returned the circuit to Open and restarted the cooldown.
    Reopened,

    /// A successful probe closed the circuit again.
    Closed(Stats),
}

/// The admission state machine seam.
///
/// Every request passes through `enter` on the way in and `exit` with its outcome on
/// the way out; both are non-blocking and safe under concurrent use.
pub(crate) trait CircuitEngine: Debug + Send + Sync + 'static {
    fn enter(&self) -> EnterResult;

    fn exit(&self, outcome: Outcome, elapsed: Duration) -> ExitResult;
}

/// Counters accumulated while the circuit is away from the closed state,
/// reported when it closes again.
#[derive(Debug, Clone)]
pub(crate) struct Stats {
    pub opened_at: Instant,
    pub probes: u64,
    pub probes_failed: u64,
    pub lost_reports: u64,
    pub rejected: u64,
    pub re_opened: u64,
}

impl Stats {
    pub fn new(opened_at: Instant) -> Self {
        Self {
            opened_at,
            probes: 0,
            probes_failed: 0,
            lost_reports: 0,
            rejected: 0,
            re_opened: 0,
        }
    }

    pub fn opened_duration(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.opened_at)
    }
}

// The default engine wraps the core state machine with tracing.
pub(crate) type Engine = EngineTelemetry<EngineCore>;

mod engine_core;
pub(crate) use engine_core::*;

mod engine_telemetry;
pub(crate) use engine_telemetry::*;

mod single_probe;
pub(crate) use single_probe::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circuit_state_as_str() {
        assert_eq!(CircuitState::Closed.as_str(), "closed");
        assert_eq!(CircuitState::Open.as_str(), "open");
        assert_eq!(CircuitState::HalfOpen.as_str(), "half_open");
    }

    #[test]
    fn stats_opened_duration() {
        let opened_at = Instant::now();
        let stats = Stats::new(opened_at);

        assert_eq!(stats.opened_duration(opened_at + Duration::from_secs(10)), Duration::from_secs(10));
    }
}
