// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-axis gesture state machine.

use std::time::Duration;

use tokio::time::Instant;

/// Phase of a controllable axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPhase {
    /// Hardware-synced: pushes update the local value.
    Idle,
    /// A gesture is in progress: pushes are suppressed.
    Touching,
    /// The final value was committed: pushes are suppressed until the guard
    /// window ends.
    Committing {
        /// End of the guard window.
        until: Instant,
    },
}

impl AxisPhase {
    /// Returns `true` if hardware pushes are suppressed in this phase at `now`.
    #[must_use]
    pub fn is_guarded(&self, now: Instant) -> bool {
        match self {
            Self::Idle => false,
            Self::Touching => true,
            Self::Committing { until } => now < *until,
        }
    }
}

/// What happened to a hardware push offered to an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The local value now shows the pushed value.
    Applied,
    /// The pushed value equals the local value.
    Unchanged,
    /// A gesture owns the axis; the push was discarded.
    Suppressed,
}

/// Local value of one axis and the phase deciding who may change it.
///
/// The machine is synchronous and takes the current time as an argument, so
/// it can be driven from any event source.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lampcore::reconcile::{AxisMachine, AxisPhase, PushOutcome};
/// use tokio::time::Instant;
///
/// let now = Instant::now();
/// let mut axis = AxisMachine::new(100u16);
///
/// axis.touch_move(400, now);
/// assert_eq!(axis.phase(), AxisPhase::Touching);
/// assert_eq!(axis.on_push(120, now), PushOutcome::Suppressed);
/// assert_eq!(axis.value(), 400);
///
/// axis.touch_end(None, now, Duration::from_secs(1));
/// assert_eq!(axis.on_push(120, now + Duration::from_secs(2)), PushOutcome::Applied);
/// assert_eq!(axis.value(), 120);
/// ```
#[derive(Debug, Clone)]
pub struct AxisMachine<V> {
    value: V,
    hardware: V,
    phase: AxisPhase,
}

impl<V: Copy + PartialEq> AxisMachine<V> {
    /// Creates an idle axis showing the hardware value.
    #[must_use]
    pub fn new(hardware: V) -> Self {
        Self {
            value: hardware,
            hardware,
            phase: AxisPhase::Idle,
        }
    }

    /// Returns the local value to render.
    #[must_use]
    pub fn value(&self) -> V {
        self.value
    }

    /// Returns the last value reported by the hardware.
    #[must_use]
    pub fn hardware_value(&self) -> V {
        self.hardware
    }

    /// Returns the current phase, as last transitioned.
    #[must_use]
    pub fn phase(&self) -> AxisPhase {
        self.phase
    }

    /// Returns the phase at `now`, with an elapsed commit guard resolved to
    /// idle.
    #[must_use]
    pub fn phase_at(&mut self, now: Instant) -> AxisPhase {
        self.expire(now);
        self.phase
    }

    /// Returns `true` if a gesture owns the axis at `now`.
    #[must_use]
    pub fn is_guarded(&self, now: Instant) -> bool {
        self.phase.is_guarded(now)
    }

    /// Starts a gesture.
    pub fn touch_start(&mut self) {
        self.phase = AxisPhase::Touching;
    }

    /// Shows a gesture value; starts the gesture if none is in progress.
    pub fn touch_move(&mut self, value: V, now: Instant) {
        self.expire(now);
        self.phase = AxisPhase::Touching;
        self.value = value;
    }

    /// Ends the gesture and returns the value to commit.
    ///
    /// With `None`, the last shown value is committed. Pushes stay
    /// suppressed for `guard` after `now`.
    pub fn touch_end(&mut self, value: Option<V>, now: Instant, guard: Duration) -> V {
        if let Some(value) = value {
            self.value = value;
        }
        self.phase = AxisPhase::Committing { until: now + guard };
        self.value
    }

    /// Offers a hardware-pushed value.
    pub fn on_push(&mut self, value: V, now: Instant) -> PushOutcome {
        self.hardware = value;
        self.expire(now);
        if self.phase.is_guarded(now) {
            return PushOutcome::Suppressed;
        }
        if self.value == value {
            PushOutcome::Unchanged
        } else {
            self.value = value;
            PushOutcome::Applied
        }
    }

    /// Drops any gesture and guard without changing the value.
    pub fn cancel(&mut self) {
        self.phase = AxisPhase::Idle;
    }

    /// Resets the axis to a hardware value, dropping any gesture.
    pub fn resync(&mut self, hardware: V) {
        self.value = hardware;
        self.hardware = hardware;
        self.phase = AxisPhase::Idle;
    }

    fn expire(&mut self, now: Instant) {
        if let AxisPhase::Committing { until } = self.phase
            && now >= until
        {
            self.phase = AxisPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUARD: Duration = Duration::from_millis(1000);

    #[test]
    fn idle_axis_tracks_pushes() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(10u16);
        assert_eq!(axis.on_push(20, now), PushOutcome::Applied);
        assert_eq!(axis.value(), 20);
        assert_eq!(axis.on_push(20, now), PushOutcome::Unchanged);
    }

    #[test]
    fn move_without_start_begins_gesture() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(0u16);
        axis.touch_move(5, now);
        assert_eq!(axis.phase(), AxisPhase::Touching);
        assert_eq!(axis.value(), 5);
    }

    #[test]
    fn touching_suppresses_but_records_hardware() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(0u16);
        axis.touch_start();
        assert_eq!(axis.on_push(900, now), PushOutcome::Suppressed);
        assert_eq!(axis.value(), 0);
        assert_eq!(axis.hardware_value(), 900);
    }

    #[test]
    fn commit_guard_expires() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(0u16);
        axis.touch_move(300, now);
        assert_eq!(axis.touch_end(Some(350), now, GUARD), 350);

        let inside = now + Duration::from_millis(999);
        assert_eq!(axis.on_push(100, inside), PushOutcome::Suppressed);
        assert!(matches!(axis.phase_at(inside), AxisPhase::Committing { .. }));

        let after = now + GUARD;
        assert_eq!(axis.phase_at(after), AxisPhase::Idle);
        assert_eq!(axis.on_push(100, after), PushOutcome::Applied);
    }

    #[test]
    fn touch_end_without_value_commits_last_move() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(0u16);
        axis.touch_move(1, now);
        axis.touch_move(2, now);
        assert_eq!(axis.touch_end(None, now, GUARD), 2);
    }

    #[test]
    fn cancel_clears_guard() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(0u16);
        axis.touch_end(Some(7), now, GUARD);
        axis.cancel();
        assert_eq!(axis.on_push(8, now), PushOutcome::Applied);
    }

    #[test]
    fn resync_overrides_gesture() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(0u16);
        axis.touch_move(50, now);
        axis.resync(10);
        assert_eq!(axis.value(), 10);
        assert!(!axis.is_guarded(now));
    }

    #[test]
    fn new_gesture_during_guard_restarts_touching() {
        let now = Instant::now();
        let mut axis = AxisMachine::new(0u16);
        axis.touch_end(Some(1), now, GUARD);
        axis.touch_move(2, now + Duration::from_millis(10));
        assert_eq!(axis.phase(), AxisPhase::Touching);
    }
}
