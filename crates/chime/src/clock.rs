// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::Instant;

use crate::state::ClockState;

/// Provides an abstraction for time-related operations.
///
/// Working with time is notoriously difficult to test and control. The clock enables time
/// control in tests while providing zero-cost overhead in production. When the `test-util`
/// feature is enabled, the clock provides additional functionality to control the passage
/// of time. This makes tests faster and more reliable.
///
/// The clock is used for:
///
/// - Retrieving the current monotonic time as an [`Instant`].
/// - Creating [`Stopwatch`][crate::Stopwatch] instances that simplify time measurements.
///
/// # Clock construction
///
/// In production, construct the clock with [`Clock::new`], which reads system time.
/// In tests, construct the clock via [`ClockControl`][crate::ClockControl] (available
/// with the `test-util` feature) so the passage of time is controlled manually.
///
/// # Cloning and shared state
///
/// Cloning a clock is inexpensive (just an `Arc` clone) and every clone shares the same
/// underlying state, including - when the `test-util` feature is enabled - the controlled
/// passage of time. Time adjustments performed through one clone are visible to every
/// other clone created from the same clock.
///
/// # Examples
///
/// ```
/// use chime::Clock;
///
/// # fn retrieve_instant(clock: &Clock) {
/// let instant1 = clock.instant();
/// let instant2 = clock.instant();
///
/// assert!(instant2 >= instant1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Clock(Arc<ClockState>);

impl Clock {
    /// Creates a new clock that reads the system's monotonic time.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(ClockState::System))
    }

    /// Creates a new frozen clock.
    ///
    /// This is a convenience method equivalent to calling `ClockControl::new().to_clock()`.
    ///
    /// > **Note**: The returned clock will not advance time on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread::sleep;
    /// use std::time::Duration;
    ///
    /// use chime::Clock;
    ///
    /// let clock = Clock::new_frozen();
    /// let instant = clock.instant();
    ///
    /// sleep(Duration::from_micros(1));
    ///
    /// assert_eq!(instant, clock.instant());
    /// ```
    #[cfg(any(feature = "test-util", test))]
    #[must_use]
    pub fn new_frozen() -> Self {
        crate::ClockControl::new().to_clock()
    }

    #[cfg(any(feature = "test-util", test))]
    pub(crate) fn with_control(control: &crate::ClockControl) -> Self {
        Self(Arc::new(ClockState::Control(control.clone())))
    }

    /// Retrieves the current [`Instant`] time.
    ///
    /// An `Instant` represents a monotonic time point guaranteed to always increase.
    /// The instant is not affected by system clock changes and provides a stable
    /// reference point for measuring elapsed time.
    ///
    /// > **Important**: When measuring elapsed time with [`Instant`], use
    /// > [`Instant::duration_since`] rather than `Instant::elapsed`. The `elapsed`
    /// > method bypasses the clock and goes directly to system time, which means it
    /// > won't respect controlled time in tests.
    #[must_use]
    pub fn instant(&self) -> Instant {
        match self.0.as_ref() {
            #[cfg(any(feature = "test-util", test))]
            ClockState::Control(control) => control.instant(),
            ClockState::System => Instant::now(),
        }
    }

    /// Creates a new [`Stopwatch`][crate::Stopwatch] that starts measuring elapsed time.
    ///
    /// # Examples
    ///
    /// ```
    /// use chime::Clock;
    ///
    /// # fn measure(clock: &Clock) -> std::time::Duration {
    /// let stopwatch = clock.stopwatch();
    /// // Perform some operation...
    /// stopwatch.elapsed()
    /// # }
    /// ```
    #[must_use]
    pub fn stopwatch(&self) -> crate::Stopwatch {
        crate::Stopwatch::new(self)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Self> for Clock {
    fn as_ref(&self) -> &Self {
        self
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::fmt::Debug;
    use std::time::Duration;

    use super::*;
    use crate::ClockControl;

    static_assertions::assert_impl_all!(Clock: Debug, Send, Sync, Clone, AsRef<Clock>);

    #[test]
    fn system_clock_tracks_real_time() {
        let before = Instant::now();
        let clock = Clock::new();

        assert!(clock.instant() >= before);
    }

    #[test]
    fn instant_with_control() {
        let control = ClockControl::new();
        let clock = control.to_clock();

        let now = clock.instant();
        assert_eq!(now, control.instant());

        control.advance(Duration::from_secs(10));

        assert_eq!(clock.instant(), now + Duration::from_secs(10));
    }

    #[test]
    fn clones_share_controlled_time() {
        let control = ClockControl::new();
        let clock = control.to_clock();
        let clone = clock.clone();

        control.advance(Duration::from_secs(3));

        assert_eq!(clock.instant(), clone.instant());
    }

    #[test]
    fn new_frozen_ok() {
        let clock = Clock::new_frozen();

        let instant = clock.instant();

        std::thread::sleep(Duration::from_micros(1));

        // The frozen clock should return the same instant on every call
        assert_eq!(instant, clock.instant());
    }

    #[test]
    fn default_is_system() {
        let before = Instant::now();
        let clock = Clock::default();
        assert!(clock.instant() >= before);
    }

    #[test]
    fn as_ref_ok() {
        let clock = Clock::new_frozen();
        let _: &Clock = clock.as_ref();
    }
}
