// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lamp state types.
//!
//! [`DeviceLightState`] is the shape both of the hardware-reported state and
//! of the optimistic local mirror a screen renders. [`StateChange`] is the
//! payload of a hardware push.
//!
//! # Examples
//!
//! ```
//! use lampcore::state::{DeviceLightState, StateChange};
//!
//! let mut state = DeviceLightState::new();
//! state.apply(&StateChange::Power(true));
//! assert!(state.power);
//! ```

mod light_state;
mod state_change;

pub use light_state::DeviceLightState;
pub use state_change::StateChange;
