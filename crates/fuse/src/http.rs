// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! HTTP conventions for circuit-breaker admission control.
//!
//! Maps HTTP responses onto the binary outcome model: server errors (status `5xx`)
//! count against the circuit, everything else is a success. Client errors are the
//! caller's fault, not the downstream's, so they do not trip the circuit.

use http::{Response, StatusCode};

use crate::outcome::Outcome;

/// Classifies an HTTP response for outcome reporting.
///
/// Responses with a server-error status (`500` and above) are failures; all other
/// statuses, including client errors such as `404` and `429`, are successes.
#[must_use]
pub fn classify_response<B>(response: &Response<B>) -> Outcome {
    if response.status().is_server_error() {
        Outcome::Failure
    } else {
        Outcome::Success
    }
}

/// Builds the response returned to callers whose request the circuit rejected.
///
/// The response is `503 Service Unavailable` with an empty body, signaling that the
/// request never reached the protected component and may be retried later.
#[must_use]
pub fn rejected_response<B: Default>() -> Response<B> {
    let mut response = Response::new(B::default());
    *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
    response
}
