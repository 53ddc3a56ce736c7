// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Demonstrates circuit-breaker admission control for an HTTP-shaped service by:
//!
//! 1. Sending traffic through an [`AdmissionGuard`] that classifies responses by status
//! 2. Tripping the circuit when the simulated service starts returning `502`s
//! 3. Answering rejected requests with the canned `503` response
//! 4. Recovering automatically once a probe sees a healthy response

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use chime::Clock;
use fuse::http::{classify_response, rejected_response};
use fuse::{AdmissionGuard, Circuit, CircuitOptions};
use futures::executor::block_on;
use http::{Response, StatusCode};

fn main() {
    tracing_subscriber::fmt().init();

    let clock = Clock::new();
    let options = CircuitOptions::new()
        .failure_threshold(0.5)
        .window_duration(Duration::from_secs(2))
        .cooldown_duration(Duration::from_millis(200));
    let circuit = Circuit::new("demo_backend", options, &clock);
    let guard = AdmissionGuard::new(circuit, &clock, classify_response);

    let service = FlakyService::new();

    for attempt in 0..30_u32 {
        std::thread::sleep(Duration::from_millis(50));

        let response = match block_on(guard.run(service.call())) {
            Ok(response) => response,
            Err(_rejected) => rejected_response(),
        };

        println!("attempt {attempt}: {}", response.status());
    }
}

/// Simulated backend that suffers an outage and then recovers.
struct FlakyService {
    calls: AtomicU32,
}

impl FlakyService {
    fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }

    async fn call(&self) -> Response<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);

        // Calls 5 through 14 fail; before and after, the backend is healthy
        let status = if (5..15).contains(&call) {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::OK
        };

        let mut response = Response::new(Vec::new());
        *response.status_mut() = status;
        response
    }
}
