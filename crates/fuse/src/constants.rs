// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// Scale used for fixed-point failure-rate comparisons (parts per million).
///
/// Comparing `failures * RATIO_SCALE >= threshold_ppm * samples` keeps the
/// trip decision exact at the threshold boundary, where floating-point
/// division would drift.
pub(crate) const RATIO_SCALE: u64 = 1_000_000;

/// Number of buckets the sliding window is divided into.
///
/// With the default 5-second window this yields 1-second buckets. Coarser
/// buckets slightly smooth the window boundary, which is acceptable for a
/// heuristic safety valve.
pub(crate) const BUCKET_COUNT: u32 = 5;

/// Minimum allowed duration for the sliding window.
pub(crate) const MIN_WINDOW_DURATION: Duration = Duration::from_secs(1);

/// Default failure ratio that trips the circuit from Closed to Open.
pub(crate) const DEFAULT_FAILURE_THRESHOLD: f64 = 0.05;

/// Default span of the sliding window over which the failure ratio is computed.
pub(crate) const DEFAULT_WINDOW_DURATION: Duration = Duration::from_secs(5);

/// Default duration the circuit remains open before a probe is allowed.
pub(crate) const DEFAULT_COOLDOWN_DURATION: Duration = Duration::from_secs(1);

/// Default minimum sample count before the circuit may trip.
///
/// The default of 1 means any recorded outcome makes the window eligible for
/// evaluation; an empty window never trips the circuit.
pub(crate) const DEFAULT_MIN_SAMPLES: u32 = 1;

pub(crate) const ERR_POISONED_LOCK: &str = "poisoned lock - cannot continue execution because admission decisions can no longer be made consistently";
