// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Failure-rate circuit breaking for request admission.
//!
//! This crate decides whether a request should be admitted to a protected downstream
//! component based on the recent failure rate of calls to that component. When too
//! many recent calls fail, the circuit opens and requests fail fast instead of piling
//! onto a struggling dependency; after a cooldown a single probe tests for recovery.
//!
//! # Core Types
//!
//! - [`Circuit`]: the breaker itself; cheap to clone, safe to share across threads.
//! - [`Permit`]: a single-use admission handle that guarantees every admitted call
//!   reports an outcome.
//! - [`AdmissionGuard`]: wraps async invocations with the full admit/invoke/classify/
//!   report pattern.
//! - [`CircuitOptions`]: failure threshold, sliding window, and cooldown settings.
//!
//! # Quick Start
//!
//! ```rust
//! use chime::Clock;
//! use fuse::{Circuit, CircuitOptions};
//!
//! let clock = Clock::new();
//! let circuit = Circuit::new("inventory", CircuitOptions::new(), &clock);
//!
//! if let Some(permit) = circuit.acquire() {
//!     let stopwatch = clock.stopwatch();
//!     // ... call the downstream component ...
//!     permit.success(stopwatch.elapsed());
//! } else {
//!     // circuit is open: fail fast without touching the downstream
//! }
//! ```
//!
//! # How Admission Works
//!
//! Outcomes are recorded in a bucketed sliding window covering the configured
//! duration (5 seconds by default). When a failure report pushes the window's
//! failure ratio to the threshold (5% by default), the circuit opens and every
//! request is rejected for the cooldown duration (1 second by default). The first
//! request after the cooldown becomes the probe: if it succeeds the circuit closes
//! with a fresh window, if it fails the circuit re-opens and the cooldown restarts.
//!
//! All decisions run in O(1) time with a single short critical section; clock reads
//! happen outside the lock. Time comes from [`chime::Clock`], so tests drive the
//! breaker deterministically through `chime::ClockControl` (available with chime's
//! `test-util` feature) without sleeping.
//!
//! # Features
//!
//! - `serde`: enables serialization of [`CircuitOptions`] for configuration files.
//! - `http`: enables the [`http`] module mapping HTTP responses onto outcomes.

pub use circuit::{Circuit, Permit};
pub use guard::{AdmissionGuard, Rejected};
pub use options::CircuitOptions;
pub use outcome::Outcome;

mod circuit;
mod constants;
mod engine;
mod guard;
mod options;
mod outcome;
mod window;

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub mod http;
