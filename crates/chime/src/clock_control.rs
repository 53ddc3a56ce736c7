// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::Clock;

/// Controls the flow of time in tests.
///
/// This is useful for testing time-sensitive code without having to wait for real time
/// to pass. `ClockControl` is available when the `test-util` feature is enabled.
///
/// To create a [`Clock`] from `ClockControl`, use the [`ClockControl::to_clock`] method.
///
/// # Examples
///
/// ## Advancing time manually
///
/// ```
/// # use std::time::Duration;
/// # use chime::{Clock, ClockControl};
/// let control = ClockControl::new();
/// let clock = control.to_clock();
///
/// let now = clock.instant();
///
/// // Advance the time by one second
/// control.advance(Duration::from_secs(1));
///
/// assert_eq!(clock.instant() - now, Duration::from_secs(1));
/// ```
///
/// ## Advancing time automatically
///
/// ```
/// # use std::time::Duration;
/// # use chime::{Clock, ClockControl};
/// let clock = ClockControl::new()
///     .auto_advance(Duration::from_secs(1))
///     .to_clock();
///
/// let now = clock.instant();
///
/// assert_eq!(clock.instant() - now, Duration::from_secs(1));
/// ```
///
/// # Production code and `ClockControl`
///
/// You should never enable the `test-util` feature or use `ClockControl` in production
/// code. Always ensure that the `test-util` feature is only enabled for `dev-dependencies`:
///
/// ```toml
/// chime = { version = "*", features = ["test-util"] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClockControl {
    /// Clock control requires controlling the flow of time across threads.
    /// For this reason, we need to use a mutex to ensure that state is consistent
    /// across all threads.
    state: Arc<Mutex<State>>,
}

impl ClockControl {
    /// Creates a new `ClockControl` instance.
    ///
    /// By default, the clock control has no auto-advance set and time is frozen at the
    /// moment of creation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new())),
        }
    }

    /// Converts the `ClockControl` to a `Clock` instance.
    #[must_use]
    pub fn to_clock(&self) -> Clock {
        Clock::with_control(self)
    }

    /// Sets the duration by which the clock will auto-advance on each read of the
    /// current time.
    #[must_use]
    pub fn auto_advance(self, duration: Duration) -> Self {
        self.with_state(|v| v.auto_advance = duration);
        self
    }

    /// Advances the controlled time by the given duration.
    pub fn advance(&self, duration: Duration) {
        self.with_state(|v| v.offset += duration);
    }

    /// Retrieves the current controlled time.
    ///
    /// When auto-advance is set, each read moves the clock forward by the configured
    /// duration before returning.
    #[must_use]
    pub fn instant(&self) -> Instant {
        self.with_state(|v| {
            v.offset += v.auto_advance;
            v.origin + v.offset
        })
    }

    fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut State) -> R,
    {
        let mut state = self.state.lock().expect("clock control state lock poisoned");
        f(&mut state)
    }
}

#[derive(Debug)]
struct State {
    origin: Instant,
    offset: Duration,
    auto_advance: Duration,
}

impl State {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Duration::ZERO,
            auto_advance: Duration::ZERO,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
