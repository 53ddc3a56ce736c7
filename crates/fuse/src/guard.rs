// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use chime::Clock;

use crate::circuit::Circuit;
use crate::outcome::Outcome;

/// Error returned when the circuit refuses to admit a request.
///
/// The protected component was never invoked; callers should fail fast or surface the
/// rejection to their own callers rather than retry immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request rejected: circuit is open")]
pub struct Rejected;

/// Wraps invocations of a protected component with circuit-breaker admission control.
///
/// The guard owns the full call pattern so call sites cannot get it wrong: ask the
/// circuit for admission, invoke the work, time it, classify the output into a binary
/// outcome, and report that outcome back. Rejected requests return [`Rejected`]
/// without the work ever being polled.
///
/// The output classifier is fixed at construction so every call site of the same guard
/// judges outcomes the same way.
///
/// # Examples
///
/// ```
/// use chime::Clock;
/// use fuse::{AdmissionGuard, Circuit, CircuitOptions, Outcome};
///
/// # futures::executor::block_on(async {
/// let clock = Clock::new();
/// let circuit = Circuit::new("lookup", CircuitOptions::new(), &clock);
/// let guard = AdmissionGuard::new(circuit, &clock, |result: &Result<u32, &str>| {
///     match result {
///         Ok(_) => Outcome::Success,
///         Err(_) => Outcome::Failure,
///     }
/// });
///
/// let result = guard.run(async { Ok::<_, &str>(42) }).await;
/// assert_eq!(result, Ok(Ok(42)));
/// # });
/// ```
pub struct AdmissionGuard<Out, C> {
    circuit: Circuit,
    clock: Clock,
    classify: C,
    _marker: PhantomData<fn(&Out)>,
}

impl<Out, C> AdmissionGuard<Out, C>
where
    C: Fn(&Out) -> Outcome,
{
    /// Creates a guard that admits work through `circuit` and judges each output
    /// with `classify`.
    pub fn new(circuit: Circuit, clock: &Clock, classify: C) -> Self {
        Self {
            circuit,
            clock: clock.clone(),
            classify,
            _marker: PhantomData,
        }
    }

    /// Runs one invocation of the protected component through the circuit.
    ///
    /// When admitted, awaits `work`, classifies its output, and reports the outcome
    /// with the measured elapsed time. When rejected, returns [`Rejected`] without
    /// polling `work`.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] when the circuit is open and this call is not the probe.
    pub async fn run(&self, work: impl Future<Output = Out>) -> Result<Out, Rejected> {
        let Some(permit) = self.circuit.acquire() else {
            return Err(Rejected);
        };

        let stopwatch = self.clock.stopwatch();
        let output = work.await;

        permit.report((self.classify)(&output), stopwatch.elapsed());
        Ok(output)
    }
}

impl<Out, C> Debug for AdmissionGuard<Out, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionGuard")
            .field("circuit", &self.circuit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chime::ClockControl;
    use futures::executor::block_on;

    use super::*;
    use crate::options::CircuitOptions;

    fn classify(result: &Result<u32, ()>) -> Outcome {
        match result {
            Ok(_) => Outcome::Success,
            Err(()) => Outcome::Failure,
        }
    }

    fn guarded() -> (ClockControl, Circuit, AdmissionGuard<Result<u32, ()>, fn(&Result<u32, ()>) -> Outcome>) {
        let control = ClockControl::new();
        let clock = control.to_clock();
        let circuit = Circuit::new("test", CircuitOptions::new(), &clock);

        (control, circuit.clone(), AdmissionGuard::new(circuit, &clock, classify))
    }

    #[test]
    fn admitted_work_returns_its_output() {
        let (_control, _circuit, guard) = guarded();

        assert_eq!(block_on(guard.run(async { Ok(7) })), Ok(Ok(7)));
        assert_eq!(block_on(guard.run(async { Err(()) })), Ok(Err(())));
    }

    #[test]
    fn failures_trip_the_circuit_and_reject_later_calls() {
        let (_control, circuit, guard) = guarded();

        for _ in 0..10 {
            _ = block_on(guard.run(async { Err(()) }));
        }

        assert_eq!(block_on(guard.run(async { Ok(1) })), Err(Rejected));
        assert!(!circuit.allow());
    }

    #[test]
    fn rejected_work_is_never_polled() {
        let (_control, _circuit, guard) = guarded();

        for _ in 0..10 {
            _ = block_on(guard.run(async { Err(()) }));
        }

        let result = block_on(guard.run(async {
            unreachable!("work must not run while the circuit is open");
        }));

        assert_eq!(result, Err(Rejected));
    }

    #[test]
    fn probe_success_recovers_the_guard() {
        let (control, _circuit, guard) = guarded();

        for _ in 0..10 {
            _ = block_on(guard.run(async { Err(()) }));
        }
        assert_eq!(block_on(guard.run(async { Ok(1) })), Err(Rejected));

        control.advance(Duration::from_secs(1));

        assert_eq!(block_on(guard.run(async { Ok(2) })), Ok(Ok(2)));
        assert_eq!(block_on(guard.run(async { Ok(3) })), Ok(Ok(3)));
    }

    #[test]
    fn elapsed_time_comes_from_the_shared_clock() {
        let (control, _circuit, guard) = guarded();

        // The outcome report carries the controlled clock's elapsed time; advancing
        // mid-call must not panic or skew admission.
        let _control = control.auto_advance(Duration::from_millis(10));
        assert_eq!(block_on(guard.run(async { Ok(1) })), Ok(Ok(1)));
    }
}
