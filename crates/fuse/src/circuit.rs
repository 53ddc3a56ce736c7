// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use chime::Clock;

use crate::Outcome;
use crate::engine::{CircuitEngine, Engine, EngineCore, EngineTelemetry, EnterResult};
use crate::options::CircuitOptions;

/// A failure-rate circuit breaker guarding admission to one protected component.
///
/// The circuit maintains a sliding window of recent call outcomes and moves between
/// three states:
///
/// - **Closed**: normal operation, every request is admitted and its outcome recorded.
/// - **Open**: the recent failure ratio reached the configured threshold; every request
///   is rejected without reaching the protected component.
/// - **Half-open**: the cooldown elapsed; a single probe request is admitted to test
///   whether the downstream recovered, while everyone else keeps being rejected.
///
/// ```text
/// ┌────────┐      failure ratio >= threshold      ┌──────────┐
/// │ Closed │ ────────────────────────────────────▶│   Open   │
/// └────────┘                                      └──────────┘
///      ▲                                                │
///      │ probe           ┌────────────────┐    cooldown │
///      └─────────────────│   Half-Open    │◀────────────┘
///        succeeded       └────────────────┘    elapsed
/// ```
///
/// # Contract
///
/// Every caller admitted by [`allow`][Circuit::allow] must eventually report the call's
/// outcome with exactly one of [`success`][Circuit::success] or
/// [`failure`][Circuit::failure], including on error and panic paths. Prefer
/// [`acquire`][Circuit::acquire], which returns a [`Permit`] that makes this guarantee
/// structural: dropping an unreported permit counts as a failure report.
///
/// # Thread safety
///
/// All operations are non-blocking, take O(1) time and may be called concurrently from
/// any number of threads. Cloning a circuit is cheap and every clone shares the same
/// state. Construct one circuit per protected component; independent components get
/// independent breakers.
///
/// # Examples
///
/// ```
/// use chime::Clock;
/// use fuse::{Circuit, CircuitOptions};
///
/// let clock = Clock::new();
/// let circuit = Circuit::new("payments", CircuitOptions::new(), &clock);
///
/// if let Some(permit) = circuit.acquire() {
///     let stopwatch = clock.stopwatch();
///     // ... invoke the protected component ...
///     permit.success(stopwatch.elapsed());
/// } else {
///     // fail fast: the downstream is unhealthy, try again later
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Circuit {
    engine: Arc<Engine>,
}

impl Circuit {
    /// Creates a new circuit in the closed state.
    ///
    /// The `name` identifies this circuit in log events and should use `snake_case`
    /// naming to stay consistent across telemetry.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, options: CircuitOptions, clock: &Clock) -> Self {
        let core = EngineCore::new(options, clock.clone());

        Self {
            engine: Arc::new(EngineTelemetry::new(core, name.into(), clock.clone())),
        }
    }

    /// Decides whether one request may reach the protected component.
    ///
    /// Returns `true` while the circuit is closed, and for exactly one caller (the
    /// probe) once an open circuit's cooldown has elapsed. A `true` return obligates
    /// the caller to later report [`success`][Circuit::success] or
    /// [`failure`][Circuit::failure] exactly once.
    #[must_use]
    pub fn allow(&self) -> bool {
        matches!(self.engine.enter(), EnterResult::Admitted { .. })
    }

    /// Like [`allow`][Circuit::allow], but returns a single-use [`Permit`] carrying the
    /// reporting obligation, or `None` when the request is rejected.
    #[must_use]
    pub fn acquire(&self) -> Option<Permit> {
        match self.engine.enter() {
            EnterResult::Admitted { probe } => Some(Permit {
                engine: Arc::clone(&self.engine),
                probe,
                reported: false,
            }),
            EnterResult::Rejected => None,
        }
    }

    /// Records a successful call outcome.
    ///
    /// The elapsed duration of the call is carried through to log events; it does not
    /// participate in the failure-ratio computation.
    pub fn success(&self, elapsed: Duration) {
        _ = self.engine.exit(Outcome::Success, elapsed);
    }

    /// Records a failed call outcome.
    ///
    /// In the closed state this may trip the circuit open; a failed probe returns the
    /// circuit to open and restarts the cooldown.
    pub fn failure(&self, elapsed: Duration) {
        _ = self.engine.exit(Outcome::Failure, elapsed);
    }
}

/// A single-use admission permit.
///
/// Holding a permit means the request was admitted and the circuit is owed exactly one
/// outcome report. Reporting consumes the permit; dropping it unreported counts as a
/// failure report, so the obligation is met on every exit path of the caller,
/// early returns and panics included.
#[derive(Debug)]
#[must_use = "an admitted call must report its outcome; dropping the permit records a failure"]
pub struct Permit {
    engine: Arc<Engine>,
    probe: bool,
    reported: bool,
}

impl Permit {
    /// Returns `true` when this permit is the single half-open probe.
    #[must_use]
    pub fn is_probe(&self) -> bool {
        self.probe
    }

    /// Reports a successful outcome with the call's elapsed duration.
    pub fn success(self, elapsed: Duration) {
        self.report(Outcome::Success, elapsed);
    }

    /// Reports a failed outcome with the call's elapsed duration.
    pub fn failure(self, elapsed: Duration) {
        self.report(Outcome::Failure, elapsed);
    }

    /// Reports the given outcome and consumes the permit.
    pub fn report(mut self, outcome: Outcome, elapsed: Duration) {
        self.reported = true;
        _ = self.engine.exit(outcome, elapsed);
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        // An abandoned call is indistinguishable from a hung downstream, so it is
        // recorded as a failure.
        if !self.reported {
            _ = self.engine.exit(Outcome::Failure, Duration::ZERO);
        }
    }
}
