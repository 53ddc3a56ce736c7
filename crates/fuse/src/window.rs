// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::{Duration, Instant};

use crate::Outcome;
use crate::constants::{BUCKET_COUNT, RATIO_SCALE};
use crate::options::CircuitOptions;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Aggregated health snapshot of the window at a single point in time.
///
/// Carries the sample count and failure rate for observability, and the
/// healthy/unhealthy verdict computed in fixed-point arithmetic.
#[must_use]
#[derive(Debug, Copy, Clone)]
pub(crate) struct Health {
    samples: u64,
    failures: u64,
    status: HealthStatus,
}

impl Health {
    pub fn new(successes: u64, failures: u64, threshold_ppm: u64, min_samples: u32) -> Self {
        let samples = successes.saturating_add(failures);

        // The trip comparison is inclusive (>=) and performed on integers so that a ratio
        // exactly equal to the threshold counts as exceeding it. An empty window is always
        // healthy: insufficient data must never itself trigger rejection.
        let status = if samples >= u64::from(min_samples.max(1))
            && failures.saturating_mul(RATIO_SCALE) >= threshold_ppm.saturating_mul(samples)
        {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };

        Self { samples, failures, status }
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Failure ratio over the live window, for log fields only. The trip decision
    /// never uses this floating-point form.
    #[expect(clippy::cast_precision_loss, reason = "observability only, precision loss is acceptable")]
    pub fn failure_rate(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }

        self.failures as f64 / self.samples as f64
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }
}

/// Tracks call outcomes over a sliding time window as a fixed ring of buckets.
///
/// Each bucket aggregates the outcomes of one sub-interval of the window. Buckets are
/// addressed by their absolute index (elapsed time divided by the bucket duration), and
/// a slot is reset lazily when a write lands on a newer index that maps to it. Reads
/// ignore any bucket whose index has fallen out of the live range, so stale data is
/// evicted without a background task and memory stays bounded.
#[derive(Debug)]
pub(crate) struct SlidingWindow {
    buckets: Vec<Bucket>,
    bucket_duration: Duration,
    origin: Instant,
    threshold_ppm: u64,
    min_samples: u32,
}

impl SlidingWindow {
    pub fn new(options: &CircuitOptions, origin: Instant) -> Self {
        let buckets = (0..u64::from(BUCKET_COUNT)).map(Bucket::new).collect();

        Self {
            buckets,
            bucket_duration: options.bucket_duration(),
            origin,
            threshold_ppm: options.threshold_ppm(),
            min_samples: options.min_samples_clamped(),
        }
    }

    /// Records one outcome at time `now`, reusing (and thereby evicting) the ring slot
    /// covering `now` if it still holds data from a previous lap.
    pub fn record(&mut self, outcome: Outcome, now: Instant) {
        let index = self.bucket_index(now);
        let slot = usize::try_from(index % u64::from(BUCKET_COUNT)).expect("ring slot fits in usize");

        let bucket = &mut self.buckets[slot];
        if bucket.index != index {
            *bucket = Bucket::new(index);
        }

        match outcome {
            Outcome::Success => bucket.successes = bucket.successes.saturating_add(1),
            Outcome::Failure => bucket.failures = bucket.failures.saturating_add(1),
        }
    }

    /// Computes the health of the window as of `now`, counting only buckets whose time
    /// range is still inside the window.
    pub fn health(&self, now: Instant) -> Health {
        let index = self.bucket_index(now);
        let oldest_live = index.saturating_sub(u64::from(BUCKET_COUNT) - 1);

        let mut successes = 0_u64;
        let mut failures = 0_u64;

        for bucket in &self.buckets {
            if bucket.index >= oldest_live && bucket.index <= index {
                successes = successes.saturating_add(u64::from(bucket.successes));
                failures = failures.saturating_add(u64::from(bucket.failures));
            }
        }

        Health::new(successes, failures, self.threshold_ppm, self.min_samples)
    }

    fn bucket_index(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.origin);
        u64::try_from(elapsed.as_nanos() / self.bucket_duration.as_nanos()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug)]
struct Bucket {
    index: u64,
    successes: u32,
    failures: u32,
}

impl Bucket {
    fn new(index: u64) -> Self {
        Self {
            index,
            successes: 0,
            failures: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::float_cmp, reason = "exact comparisons of controlled values in tests")]

    use rstest::rstest;

    use super::*;

    fn test_window(start: Instant) -> SlidingWindow {
        // 5s window, 1s buckets, 5% threshold
        SlidingWindow::new(&CircuitOptions::new(), start)
    }

    #[test]
    fn empty_window_is_healthy() {
        let start = Instant::now();
        let window = test_window(start);

        let health = window.health(start);

        assert_eq!(health.samples(), 0);
        assert_eq!(health.failure_rate(), 0.0);
        assert_eq!(health.status(), HealthStatus::Healthy);
    }

    #[test]
    fn record_when_empty() {
        let start = Instant::now();
        let mut window = test_window(start);

        window.record(Outcome::Success, start);
        let health = window.health(start);

        assert_eq!(health.samples(), 1);
        assert_eq!(health.failure_rate(), 0.0);
    }

    #[test]
    fn outcomes_older_than_window_are_evicted() {
        let start = Instant::now();
        let mut window = test_window(start);
        window.record(Outcome::Failure, start);

        // Advance beyond the window span with no writes in between
        let later = start + Duration::from_secs(6);
        let health = window.health(later);

        assert_eq!(health.samples(), 0);
        assert_eq!(health.status(), HealthStatus::Healthy);
    }

    #[test]
    fn slot_reuse_discards_previous_lap() {
        let start = Instant::now();
        let mut window = test_window(start);
        window.record(Outcome::Failure, start);

        // One full lap later the write lands on the same slot and must reset it
        let lap = start + Duration::from_secs(5);
        window.record(Outcome::Success, lap);
        let health = window.health(lap);

        assert_eq!(health.samples(), 1);
        assert_eq!(health.failure_rate(), 0.0);
    }

    #[test]
    fn outcomes_spread_across_buckets_are_all_counted() {
        let start = Instant::now();
        let mut window = test_window(start);

        for i in 0..4 {
            window.record(Outcome::Success, start + Duration::from_secs(i));
            window.record(Outcome::Failure, start + Duration::from_secs(i));
        }

        let health = window.health(start + Duration::from_secs(4));
        assert_eq!(health.samples(), 8);
        assert_eq!(health.failure_rate(), 0.5);
    }

    #[test]
    fn partial_expiry_keeps_recent_buckets() {
        let start = Instant::now();
        let mut window = test_window(start);

        window.record(Outcome::Failure, start);
        window.record(Outcome::Success, start + Duration::from_secs(4));

        // The t=0 bucket leaves the window, the t=4 bucket remains
        let health = window.health(start + Duration::from_secs(6));
        assert_eq!(health.samples(), 1);
        assert_eq!(health.failure_rate(), 0.0);
    }

    #[rstest]
    // 6 failures out of 100 = 6% >= 5%
    #[case(94, 6, HealthStatus::Unhealthy)]
    // 95 failures out of 2000 = 4.75% < 5%
    #[case(1905, 95, HealthStatus::Healthy)]
    // exactly at the threshold trips (inclusive comparison)
    #[case(95, 5, HealthStatus::Unhealthy)]
    // all failures
    #[case(0, 10, HealthStatus::Unhealthy)]
    // no traffic
    #[case(0, 0, HealthStatus::Healthy)]
    fn health_threshold_boundaries(#[case] successes: u64, #[case] failures: u64, #[case] expected: HealthStatus) {
        let health = Health::new(successes, failures, 50_000, 1);
        assert_eq!(health.status(), expected);
    }

    #[test]
    fn min_samples_gate_suppresses_early_trips() {
        // 100% failure rate but below the sample floor
        let health = Health::new(0, 3, 500_000, 5);
        assert_eq!(health.status(), HealthStatus::Healthy);

        // At the floor the rate applies
        let health = Health::new(1, 4, 500_000, 5);
        assert_eq!(health.status(), HealthStatus::Unhealthy);
    }

    #[test]
    fn health_saturates_instead_of_overflowing() {
        let health = Health::new(u64::MAX, 1, 50_000, 1);
        assert_eq!(health.samples(), u64::MAX);
    }
}
