// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene activation.
//!
//! [`ActivationEngine`] replays a [`SavedScene`](crate::scene::SavedScene)
//! onto the lamps reached through a
//! [`ChannelDirectory`](crate::channel::ChannelDirectory), then marks the
//! scene active in the store and pushes its mode into the [`ModeSelector`].
//! Activation is best effort per step and returns an [`ActivationReport`].

mod engine;
mod mode_selector;
mod report;

pub use engine::{ActivationEngine, ActivationTarget};
pub use mode_selector::ModeSelector;
pub use report::{ActivationReport, ActivationStep, DeviceReport, SkipReason, SkippedStep};
