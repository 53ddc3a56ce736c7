// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::{Duration, Instant};

/// Claims the single trial request admitted while the circuit is half-open.
///
/// Exactly one caller may hold the probe at a time. If the probe's outcome is never
/// reported (the caller vanished), a replacement probe is re-armed once the cooldown
/// has elapsed since the last claim, so the circuit cannot stay wedged in half-open.
#[derive(Debug, Clone)]
pub(crate) struct SingleProbe {
    cooldown: Duration,
    claimed_at: Option<Instant>,
}

impl SingleProbe {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            claimed_at: None,
        }
    }

    /// Attempts to claim the probe at time `now`. Returns `true` for exactly one
    /// caller; everyone else is turned away until the probe resolves or expires.
    pub fn try_claim(&mut self, now: Instant) -> bool {
        match self.claimed_at {
            None => {
                self.claimed_at = Some(now);
                true
            }
            Some(claimed_at) if now.saturating_duration_since(claimed_at) > self.cooldown => {
                self.claimed_at = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}
