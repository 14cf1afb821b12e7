// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optimistic device state reconciliation.
//!
//! An interactive control shows the user's gesture immediately, while the
//! lamp answers asynchronously and often reports intermediate or stale
//! values. Each controllable axis runs a small state machine:
//!
//! | Phase | Hardware pushes | Entered on |
//! |-------|-----------------|------------|
//! | [`AxisPhase::Idle`] | update the mirror | start, guard expiry |
//! | [`AxisPhase::Touching`] | suppressed | touch start or first move |
//! | [`AxisPhase::Committing`] | suppressed until the guard ends | touch end |
//!
//! Move-phase writes go through a per-axis [`Throttle`]; the committed value
//! is written immediately. [`ReconcileSession`] wires the machines to a
//! [`PropertyChannel`](crate::channel::PropertyChannel), and
//! [`ColourMarkers`] keeps one colour axis per lamp for multi-lamp wheels.

mod axis;
mod gesture;
mod markers;
mod session;
mod throttle;

pub use axis::{AxisMachine, AxisPhase, PushOutcome};
pub use gesture::GestureInput;
pub use markers::ColourMarkers;
pub use session::{Axis, ReconcileSession};
pub use throttle::{Throttle, ThrottleDecision};
