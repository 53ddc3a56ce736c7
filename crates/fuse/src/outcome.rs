// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The evaluated outcome of one protected call.
///
/// From the perspective of the circuit, a call either succeeded or failed.
/// This enum captures that binary signal; the circuit does not classify
/// error types any further.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Outcome {
    /// The protected call completed successfully.
    Success,

    /// The protected call failed.
    Failure,
}

impl Outcome {
    /// Returns a stable string form of the outcome, suitable for log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    /// Returns `true` for [`Outcome::Failure`].
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failure)
    }
}
