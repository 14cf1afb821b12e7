// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for lamp control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time (and at deserialization time), so the store, reconciler and
//! activation engine never handle an out-of-range channel value.
//!
//! # Types
//!
//! - [`Level`] - Channel level on the 0-1000 scale
//! - [`Hue`] - Colour hue (0-360)
//! - [`HsvColour`] - Hue, saturation and value of the colour channel
//! - [`LightMode`] - White or colour output
//! - [`WorkMode`] - The lamp's work-mode property, including meta-modes
//! - [`DimmingTime`] - Fade/delay envelope (0-10000 ms)

mod colour;
mod dimming;
mod level;
mod mode;

pub use colour::{HsvColour, Hue};
pub use dimming::DimmingTime;
pub use level::{KELVIN_COOL, KELVIN_WARM, Level};
pub use mode::{LightMode, WorkMode};
