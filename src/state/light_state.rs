// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Instantaneous output state of one lamp.

use serde::{Deserialize, Serialize};

use super::StateChange;
use crate::types::{HsvColour, Level, LightMode};

/// Output state of one physical lamp.
///
/// White and colour values are both retained so that switching mode recalls
/// the previous values instantly; `mode` says which of them is lit.
///
/// # Examples
///
/// ```
/// use lampcore::state::DeviceLightState;
/// use lampcore::types::{HsvColour, LightMode};
///
/// let state = DeviceLightState::new()
///     .with_mode(LightMode::Colour)
///     .with_colour(HsvColour::new(300, 800, 500).unwrap());
/// assert_eq!(state.mode, LightMode::Colour);
/// assert_eq!(state.colour.hue.degrees(), 300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLightState {
    /// Whether the lamp is switched on.
    pub power: bool,
    /// The active channel set.
    pub mode: LightMode,
    /// White brightness.
    pub brightness: Level,
    /// White temperature (0 warm, 1000 cool).
    pub temperature: Level,
    /// Colour channel.
    pub colour: HsvColour,
}

impl Default for DeviceLightState {
    fn default() -> Self {
        Self {
            power: false,
            mode: LightMode::White,
            brightness: Level::MAX,
            temperature: Level::clamped(500),
            colour: HsvColour::default(),
        }
    }
}

impl DeviceLightState {
    /// Creates a state with default values (off, white, full brightness).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active mode.
    #[must_use]
    pub fn with_mode(mut self, mode: LightMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the power state.
    #[must_use]
    pub fn with_power(mut self, power: bool) -> Self {
        self.power = power;
        self
    }

    /// Sets white brightness and temperature.
    #[must_use]
    pub fn with_white(mut self, brightness: Level, temperature: Level) -> Self {
        self.brightness = brightness;
        self.temperature = temperature;
        self
    }

    /// Sets the colour channel.
    #[must_use]
    pub fn with_colour(mut self, colour: HsvColour) -> Self {
        self.colour = colour;
        self
    }

    /// Applies a state change and returns whether the state actually changed.
    ///
    /// Changes that do not describe the lamp output (selected sub-lamp,
    /// display names, meta work modes) leave the state untouched.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Power(on) => replace(&mut self.power, *on),
            StateChange::WorkMode(work_mode) => match work_mode.light_mode() {
                Some(mode) => replace(&mut self.mode, mode),
                None => false,
            },
            StateChange::Brightness(level) => replace(&mut self.brightness, *level),
            StateChange::Temperature(level) => replace(&mut self.temperature, *level),
            StateChange::Colour(colour) => replace(&mut self.colour, *colour),
            StateChange::SelectedDevice(_) | StateChange::DeviceName { .. } => false,
            StateChange::Batch(changes) => {
                let mut any_changed = false;
                for c in changes {
                    if self.apply(c) {
                        any_changed = true;
                    }
                }
                any_changed
            }
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
