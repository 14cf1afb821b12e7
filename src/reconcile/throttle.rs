// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Leading-edge throttle with one trailing flush.

use std::time::Duration;

use tokio::time::Instant;

/// What to do with a move-phase write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Send now; a new window starts.
    SendNow,
    /// Hold the value and flush it after the delay.
    Schedule(Duration),
    /// A flush is already scheduled and will carry the latest value.
    Coalesced,
}

/// Bounds move-phase writes of one axis to one per interval.
///
/// The first write after a quiet interval goes out immediately. Writes
/// arriving inside the window are coalesced into a single trailing flush at
/// the end of the window, which carries the latest value and opens the next
/// window.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_sent: Option<Instant>,
    pending: bool,
}

impl Throttle {
    /// Creates a throttle with the minimum inter-send interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
            pending: false,
        }
    }

    /// Returns the minimum inter-send interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` while a trailing flush is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Offers a write at `now`.
    pub fn offer(&mut self, now: Instant) -> ThrottleDecision {
        match self.last_sent {
            Some(sent) if now.duration_since(sent) < self.interval => {
                if self.pending {
                    ThrottleDecision::Coalesced
                } else {
                    self.pending = true;
                    ThrottleDecision::Schedule(sent + self.interval - now)
                }
            }
            _ => {
                self.last_sent = Some(now);
                ThrottleDecision::SendNow
            }
        }
    }

    /// Records the trailing flush. Returns `false` if it was cancelled.
    pub fn flush(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.last_sent = Some(now);
        true
    }

    /// Cancels a scheduled flush.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Forgets the window and any scheduled flush.
    pub fn reset(&mut self) {
        self.pending = false;
        self.last_sent = None;
    }
}
