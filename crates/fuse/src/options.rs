// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use crate::constants::{
    BUCKET_COUNT, DEFAULT_COOLDOWN_DURATION, DEFAULT_FAILURE_THRESHOLD, DEFAULT_MIN_SAMPLES,
    DEFAULT_WINDOW_DURATION, MIN_WINDOW_DURATION, RATIO_SCALE,
};

/// Construction-time configuration for a [`Circuit`][crate::Circuit].
///
/// Options are created with [`CircuitOptions::new`] (or [`Default`]) and refined with the
/// builder methods. Out-of-range values are clamped into their valid range rather than
/// rejected, so constructing a circuit never fails.
///
/// # Defaults
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | Failure threshold | `0.05` (5%) | Failure ratio that trips the circuit open |
/// | Window duration | `5s` | Sliding window span over which the ratio is computed |
/// | Cooldown duration | `1s` | Time the circuit stays open before a probe is allowed |
/// | Minimum samples | `1` | Sample count required before the circuit may trip |
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use fuse::CircuitOptions;
///
/// let options = CircuitOptions::new()
///     .failure_threshold(0.1)
///     .window_duration(Duration::from_secs(30))
///     .cooldown_duration(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CircuitOptions {
    failure_threshold: f64,
    window_duration: Duration,
    cooldown_duration: Duration,
    min_samples: u32,
}

impl CircuitOptions {
    /// Creates options with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            window_duration: DEFAULT_WINDOW_DURATION,
            cooldown_duration: DEFAULT_COOLDOWN_DURATION,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }

    /// Sets the failure ratio in `(0, 1]` that trips the circuit open.
    ///
    /// The comparison against the window is inclusive: a ratio exactly equal to the
    /// threshold trips the circuit. Values outside `(0, 1]` are clamped.
    #[must_use]
    pub fn failure_threshold(mut self, threshold: f64) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Sets the sliding window span over which the failure ratio is computed.
    ///
    /// Durations below one second are clamped up to one second.
    #[must_use]
    pub fn window_duration(mut self, duration: Duration) -> Self {
        self.window_duration = duration;
        self
    }

    /// Sets how long the circuit stays open before a single probe is allowed through.
    #[must_use]
    pub fn cooldown_duration(mut self, duration: Duration) -> Self {
        self.cooldown_duration = duration;
        self
    }

    /// Sets the minimum number of recorded outcomes required in the window before the
    /// circuit may trip.
    ///
    /// The default of 1 means the circuit trips as soon as any recorded traffic pushes
    /// the ratio to the threshold; an empty window is always treated as healthy.
    #[must_use]
    pub fn min_samples(mut self, samples: u32) -> Self {
        self.min_samples = samples;
        self
    }

    /// The failure threshold in fixed-point parts per million, clamped into `(0, 1]`.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "the value is clamped into (0, 1] before scaling"
    )]
    pub(crate) fn threshold_ppm(&self) -> u64 {
        let clamped = self.failure_threshold.clamp(f64::EPSILON, 1.0);
        (clamped * RATIO_SCALE as f64).round().max(1.0) as u64
    }

    pub(crate) fn window_duration_clamped(&self) -> Duration {
        self.window_duration.max(MIN_WINDOW_DURATION)
    }

    pub(crate) fn bucket_duration(&self) -> Duration {
        self.window_duration_clamped() / BUCKET_COUNT
    }

    pub(crate) fn cooldown(&self) -> Duration {
        self.cooldown_duration
    }

    pub(crate) fn min_samples_clamped(&self) -> u32 {
        self.min_samples.max(1)
    }
}

impl Default for CircuitOptions {
    fn default() -> Self {
        Self::new()
    }
}
