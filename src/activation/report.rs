// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! What an activation did.

use std::fmt;

use crate::channel::Property;
use crate::scene::SceneId;
use crate::types::{HsvColour, Level, WorkMode};

/// One ordered sub-step of reproducing a device entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStep {
    /// Switch the lamp on before a payload.
    PowerOn,
    /// Select the work mode the payload is interpreted in.
    WorkMode(WorkMode),
    /// Colour payload.
    Colour(HsvColour),
    /// Combined white payload.
    White {
        /// Stored brightness.
        brightness: Level,
        /// Stored temperature, if any.
        temperature: Option<Level>,
    },
}

impl ActivationStep {
    /// Returns the properties the step writes.
    #[must_use]
    pub fn properties(&self) -> Vec<Property> {
        match self {
            Self::PowerOn => vec![Property::SwitchLed],
            Self::WorkMode(_) => vec![Property::WorkMode],
            Self::Colour(_) => vec![Property::ColourData],
            Self::White {
                temperature: Some(_),
                ..
            } => vec![Property::BrightValue, Property::TempValue],
            Self::White {
                temperature: None, ..
            } => vec![Property::BrightValue],
        }
    }

    /// Returns the step with `property` left out where the payload allows it.
    ///
    /// Only the temperature of a white payload is optional; any other
    /// combination returns the step unchanged.
    #[must_use]
    pub fn without(self, property: Property) -> Self {
        match self {
            Self::White { brightness, .. } if property == Property::TempValue => Self::White {
                brightness,
                temperature: None,
            },
            other => other,
        }
    }
}

impl fmt::Display for ActivationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerOn => f.write_str("power on"),
            Self::WorkMode(mode) => write!(f, "work mode {mode}"),
            Self::Colour(colour) => write!(f, "colour {colour}"),
            Self::White { brightness, .. } => write!(f, "white {}", brightness.value()),
        }
    }
}

/// Why a step or device was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The lamp does not expose the property.
    Unsupported(Property),
    /// The transport refused the write.
    Rejected(String),
    /// No channel reaches the device.
    Unreachable,
    /// The entry carries no payload for its mode.
    NoPayload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(property) => write!(f, "unsupported property {property}"),
            Self::Rejected(reason) => write!(f, "rejected: {reason}"),
            Self::Unreachable => f.write_str("device unreachable"),
            Self::NoPayload => f.write_str("no payload"),
        }
    }
}

/// A step that was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStep {
    /// The step, or `None` if the whole device was skipped.
    pub step: Option<ActivationStep>,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome for one targeted device entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    /// Device id from the scene entry.
    pub device_id: String,
    /// Steps dispatched, in order.
    pub applied: Vec<ActivationStep>,
    /// Steps not applied.
    pub skipped: Vec<SkippedStep>,
}

impl DeviceReport {
    pub(crate) fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            applied: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub(crate) fn skip(&mut self, step: Option<ActivationStep>, reason: SkipReason) {
        self.skipped.push(SkippedStep { step, reason });
    }

    /// Returns `true` if every step was applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Outcome of a scene activation.
///
/// Activation is best effort per step; the report lists what was dispatched
/// and what was skipped so the caller can tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// The activated scene.
    pub scene_id: SceneId,
    /// Mode pushed to the mode selector.
    pub mode: WorkMode,
    /// One entry per targeted device, in scene order.
    pub devices: Vec<DeviceReport>,
    /// `false` when writes were suppressed by local-only dispatch.
    pub dispatched: bool,
}

impl ActivationReport {
    /// Returns the report for a device.
    #[must_use]
    pub fn device(&self, device_id: &str) -> Option<&DeviceReport> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    /// Returns `true` if every targeted device got every step.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.devices.iter().all(DeviceReport::is_complete)
    }

    /// Number of steps dispatched across all devices.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.devices.iter().map(|d| d.applied.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_step_properties() {
        let step = ActivationStep::White {
            brightness: Level::MAX,
            temperature: Some(Level::MIN),
        };
        assert_eq!(
            step.properties(),
            vec![Property::BrightValue, Property::TempValue]
        );
    }

    #[test]
    fn white_step_without_temperature() {
        let step = ActivationStep::White {
            brightness: Level::MAX,
            temperature: Some(Level::MIN),
        };
        assert_eq!(
            step.without(Property::TempValue).properties(),
            vec![Property::BrightValue]
        );
        assert_eq!(step.without(Property::BrightValue), step);
        assert_eq!(
            ActivationStep::PowerOn.without(Property::SwitchLed),
            ActivationStep::PowerOn
        );
    }

    #[test]
    fn report_completeness() {
        let mut device = DeviceReport::new("D1");
        device.applied.push(ActivationStep::PowerOn);
        let mut report = ActivationReport {
            scene_id: SceneId::from("s"),
            mode: WorkMode::Colour,
            devices: vec![device],
            dispatched: true,
        };
        assert!(report.is_complete());
        assert_eq!(report.applied_count(), 1);

        report.devices[0].skip(None, SkipReason::Unreachable);
        assert!(!report.device("D1").unwrap().is_complete());
        assert_eq!(SkipReason::Unreachable.to_string(), "device unreachable");
    }
}
