// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chime::Clock;

use super::{CircuitEngine, EnterResult, ExitResult, SingleProbe, Stats};
use crate::Outcome;
use crate::constants::ERR_POISONED_LOCK;
use crate::options::CircuitOptions;
use crate::window::{HealthStatus, SlidingWindow};

/// The state machine at the heart of the circuit.
///
/// All state lives behind a single mutex and every operation holds it only for O(1)
/// bookkeeping; the clock is read once per call, outside the lock, so no decision
/// races the eviction boundary mid-evaluation.
#[derive(Debug)]
pub(crate) struct EngineCore {
    state: Mutex<State>,
    options: CircuitOptions,
    clock: Clock,
}

impl EngineCore {
    pub fn new(options: CircuitOptions, clock: Clock) -> Self {
        let window = SlidingWindow::new(&options, clock.instant());

        Self {
            state: Mutex::new(State::Closed { window }),
            options,
            clock,
        }
    }
}

impl CircuitEngine for EngineCore {
    fn enter(&self) -> EnterResult {
        let now = self.clock.instant();

        // NOTE: Remember to execute all expensive operations (like time checks) outside the lock.
        self.state.lock().expect(ERR_POISONED_LOCK).enter(now, &self.options)
    }

    fn exit(&self, outcome: Outcome, _elapsed: Duration) -> ExitResult {
        let now = self.clock.instant();

        // NOTE: Remember to execute all expensive operations (like time checks) outside the lock.
        self.state.lock().expect(ERR_POISONED_LOCK).exit(outcome, now, &self.options)
    }
}

#[derive(Debug)]
enum State {
    Closed { window: SlidingWindow },
    Open { open_until: Instant, stats: Stats },
    HalfOpen { probe: SingleProbe, stats: Stats },
}

impl State {
    fn enter(&mut self, now: Instant, options: &CircuitOptions) -> EnterResult {
        match self {
            Self::Closed { .. } => EnterResult::Admitted { probe: false },
            Self::Open { open_until, stats } => {
                if now >= *open_until {
                    // Cooldown elapsed: move to half-open and hand the probe to this caller.
                    let mut probe = SingleProbe::new(options.cooldown());
                    let claimed = probe.try_claim(now);
                    stats.probes = stats.probes.saturating_add(1);

                    *self = Self::HalfOpen {
                        probe,
                        stats: stats.clone(),
                    };

                    EnterResult::Admitted { probe: claimed }
                } else {
                    stats.rejected = stats.rejected.saturating_add(1);
                    EnterResult::Rejected
                }
            }
            Self::HalfOpen { probe, stats } => {
                if probe.try_claim(now) {
                    stats.probes = stats.probes.saturating_add(1);
                    EnterResult::Admitted { probe: true }
                } else {
                    stats.rejected = stats.rejected.saturating_add(1);
                    EnterResult::Rejected
                }
            }
        }
    }

    fn exit(&mut self, outcome: Outcome, now: Instant, options: &CircuitOptions) -> ExitResult {
        match self {
            Self::Closed { window } => {
                window.record(outcome, now);

                // Only a failure can trip the circuit; successes never lower the window's
                // health and are recorded without re-evaluation.
                if !outcome.is_failure() {
                    return ExitResult::Unchanged;
                }

                let health = window.health(now);
                match health.status() {
                    HealthStatus::Healthy => ExitResult::Unchanged,
                    HealthStatus::Unhealthy => {
                        *self = Self::Open {
                            open_until: now + options.cooldown(),
                            stats: Stats::new(now),
                        };
                        ExitResult::Opened(health)
                    }
                }
            }
            Self::Open { stats, .. } => {
                // A report can arrive here when the state changed between a caller's enter
                // and exit; the window is a statistical aggregate, so dropping it is fine.
                stats.lost_reports = stats.lost_reports.saturating_add(1);
                ExitResult::Unchanged
            }
            Self::HalfOpen { stats, .. } => match outcome {
                Outcome::Success => {
                    let stats = stats.clone();

                    // Start from a fresh window so stale failure history cannot
                    // immediately re-open the circuit.
                    *self = Self::Closed {
                        window: SlidingWindow::new(options, now),
                    };

                    ExitResult::Closed(stats)
                }
                Outcome::Failure => {
                    stats.probes_failed = stats.probes_failed.saturating_add(1);
                    stats.re_opened = stats.re_opened.saturating_add(1);

                    *self = Self::Open {
                        open_until: now + options.cooldown(),
                        stats: stats.clone(),
                    };

                    ExitResult::Reopened
                }
            },
        }
    }
}
