// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colour wheel markers for several lamps.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

use super::{AxisMachine, GestureInput, PushOutcome};
use crate::error::ValueError;
use crate::types::{HsvColour, Hue, Level};

/// Largest hue or saturation step treated as jitter of the same reading.
const JITTER: u16 = 1;

/// One colour axis per lamp, as shown on a shared colour wheel.
///
/// Each marker owns its value. Dragging one marker never changes another,
/// and hardware colour reports are applied to the active lamp only.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lampcore::reconcile::{ColourMarkers, GestureInput};
/// use lampcore::types::HsvColour;
///
/// let mut markers = ColourMarkers::new(Duration::from_secs(1));
/// markers.insert("Device1", HsvColour::default());
/// markers.insert("Device2", HsvColour::default());
///
/// markers.drag_move("Device2", GestureInput::wheel(200.0, 400.0)).unwrap();
/// assert_eq!(markers.colour("Device2").unwrap().hue.degrees(), 200);
/// assert_eq!(markers.colour("Device1").unwrap().hue.degrees(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ColourMarkers {
    markers: BTreeMap<String, AxisMachine<HsvColour>>,
    active: Option<String>,
    last_hardware: Option<(Hue, Level)>,
    echo_guard: Duration,
}

impl ColourMarkers {
    /// Creates an empty marker set; commits are guarded for `echo_guard`.
    #[must_use]
    pub fn new(echo_guard: Duration) -> Self {
        Self {
            markers: BTreeMap::new(),
            active: None,
            last_hardware: None,
            echo_guard,
        }
    }

    /// Adds or replaces a marker showing `colour`.
    pub fn insert(&mut self, device_id: impl Into<String>, colour: HsvColour) {
        self.markers.insert(device_id.into(), AxisMachine::new(colour));
    }

    /// Removes a marker. Clears the active lamp if it was this one.
    pub fn remove(&mut self, device_id: &str) -> bool {
        if self.active.as_deref() == Some(device_id) {
            self.active = None;
        }
        self.markers.remove(device_id).is_some()
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns `true` if no marker is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Selects the lamp that receives hardware colour reports.
    ///
    /// Returns `false` (and changes nothing) for an unknown device.
    pub fn set_active(&mut self, device_id: &str) -> bool {
        if !self.markers.contains_key(device_id) {
            return false;
        }
        if self.active.as_deref() != Some(device_id) {
            self.active = Some(device_id.to_string());
            self.last_hardware = None;
        }
        true
    }

    /// Returns the active lamp.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Returns the colour shown for a lamp.
    #[must_use]
    pub fn colour(&self, device_id: &str) -> Option<HsvColour> {
        self.markers.get(device_id).map(AxisMachine::value)
    }

    /// Starts dragging a marker.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownVariant` for an unknown device.
    pub fn drag_start(&mut self, device_id: &str) -> Result<(), ValueError> {
        self.marker(device_id)?.touch_start();
        Ok(())
    }

    /// Moves a marker and returns its new colour.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` for an unknown device or invalid input.
    pub fn drag_move(
        &mut self,
        device_id: &str,
        input: GestureInput,
    ) -> Result<HsvColour, ValueError> {
        let (hue, saturation) = input.hue_saturation()?;
        let marker = self.marker(device_id)?;
        let colour = marker.value().with_hue_saturation(hue, saturation);
        marker.touch_move(colour, Instant::now());
        Ok(colour)
    }

    /// Releases a marker and returns the colour to commit.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` for an unknown device or invalid input.
    pub fn drag_end(
        &mut self,
        device_id: &str,
        input: Option<GestureInput>,
    ) -> Result<HsvColour, ValueError> {
        let hue_saturation = input.map(|i| i.hue_saturation()).transpose()?;
        let guard = self.echo_guard;
        let marker = self.marker(device_id)?;
        let colour = hue_saturation
            .map(|(hue, saturation)| marker.value().with_hue_saturation(hue, saturation));
        Ok(marker.touch_end(colour, Instant::now(), guard))
    }

    /// Offers a hardware colour report for the active lamp.
    ///
    /// Returns `true` if the active marker now shows it. Reports are ignored
    /// with no active lamp, while its marker is dragged or committing, and
    /// when hue and saturation are both within one step of the last applied
    /// report.
    pub fn on_hardware_colour(&mut self, colour: HsvColour) -> bool {
        let Some(active) = self.active.as_deref() else {
            return false;
        };
        let Some(marker) = self.markers.get_mut(active) else {
            return false;
        };
        if let Some((hue, saturation)) = self.last_hardware
            && hue.abs_diff(colour.hue) <= JITTER
            && saturation.abs_diff(colour.saturation) <= JITTER
        {
            return false;
        }

        match marker.on_push(colour, Instant::now()) {
            PushOutcome::Suppressed => {
                tracing::debug!(device = active, "colour report suppressed during drag");
                false
            }
            PushOutcome::Applied | PushOutcome::Unchanged => {
                self.last_hardware = Some((colour.hue, colour.saturation));
                true
            }
        }
    }

    fn marker(&mut self, device_id: &str) -> Result<&mut AxisMachine<HsvColour>, ValueError> {
        self.markers
            .get_mut(device_id)
            .ok_or_else(|| ValueError::UnknownVariant {
                kind: "colour marker",
                value: device_id.to_string(),
            })
    }
}
