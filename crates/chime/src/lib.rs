// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Primitives for obtaining, measuring, and mocking monotonic time,
//! enabling faster and more robust testing.
//!
//! # Quick Start
//!
//! ```
//! use chime::Clock;
//!
//! fn measure(clock: &Clock) -> std::time::Duration {
//!     let stopwatch = clock.stopwatch();
//!     // Perform some operation...
//!     stopwatch.elapsed()
//! }
//!
//! let clock = Clock::new();
//! let _elapsed = measure(&clock);
//! ```
//!
//! # Why?
//!
//! Working with time is notoriously difficult to test and control. This crate provides
//! a unified API for monotonic time that:
//!
//! - **Enables deterministic testing** - With the `test-util` feature, [`ClockControl`]
//!   lets you manipulate the passage of time, advancing it instantly without waiting
//!   for wall-clock time to pass.
//! - **Has zero production overhead** - Code using [`Clock`] works identically in
//!   production and tests; when `test-util` is disabled, no test machinery is compiled in.
//!
//! # Overview
//!
//! - [`Clock`] - Provides an abstraction for reading monotonic time and creating
//!   other time primitives.
//! - [`ClockControl`] - Controls the passage of time. Available when the `test-util`
//!   feature is enabled.
//! - [`Stopwatch`] - Measures elapsed time.
//!
//! # Testing
//!
//! > **Important:** Never enable the `test-util` feature for production code. Only use
//! > it in your `dev-dependencies`.

mod clock;
mod state;
mod stopwatch;

pub use clock::Clock;
pub use stopwatch::Stopwatch;

#[cfg(any(feature = "test-util", test))]
mod clock_control;

#[cfg(any(feature = "test-util", test))]
pub use clock_control::ClockControl;
