// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colour types for the lamp's colour channel.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Level;
use crate::error::ValueError;

/// Colour hue in degrees (0-360).
///
/// 0 and 360 both denote red; the lamp accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Hue(u16);

impl Hue {
    /// Maximum hue value.
    pub const MAX: u16 = 360;

    /// Creates a new hue.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHue` if the value is greater than 360.
    pub fn new(degrees: u16) -> Result<Self, ValueError> {
        if degrees > Self::MAX {
            return Err(ValueError::InvalidHue(degrees));
        }
        Ok(Self(degrees))
    }

    /// Creates a hue, clamping to the valid range.
    #[must_use]
    pub const fn clamped(degrees: u16) -> Self {
        if degrees > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(degrees)
        }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn degrees(&self) -> u16 {
        self.0
    }

    /// Returns the absolute difference to another hue, in degrees.
    #[must_use]
    pub const fn abs_diff(&self, other: Self) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<u16> for Hue {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hue> for u16 {
    fn from(hue: Hue) -> Self {
        hue.0
    }
}

impl fmt::Display for Hue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// HSV colour as the lamp reports it: hue in degrees, saturation and value
/// on the 0-1000 scale.
///
/// # Examples
///
/// ```
/// use lampcore::types::{HsvColour, Hue, Level};
///
/// let magenta = HsvColour::new(300, 800, 500).unwrap();
/// assert_eq!(magenta.hue, Hue::new(300).unwrap());
/// assert_eq!(magenta.saturation, Level::new(800).unwrap());
///
/// assert!(HsvColour::new(361, 0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvColour {
    /// Colour hue.
    pub hue: Hue,
    /// Colour saturation.
    pub saturation: Level,
    /// Colour value (brightness of the colour channel).
    pub value: Level,
}

impl HsvColour {
    /// Creates a colour from raw components.
    ///
    /// # Errors
    ///
    /// Returns error if any component is outside its range.
    pub fn new(hue: u16, saturation: u16, value: u16) -> Result<Self, ValueError> {
        Ok(Self {
            hue: Hue::new(hue)?,
            saturation: Level::new(saturation)?,
            value: Level::new(value)?,
        })
    }

    /// Returns a copy with a different hue and saturation, keeping value.
    #[must_use]
    pub const fn with_hue_saturation(self, hue: Hue, saturation: Level) -> Self {
        Self {
            hue,
            saturation,
            value: self.value,
        }
    }
}

impl Default for HsvColour {
    fn default() -> Self {
        Self {
            hue: Hue::clamped(0),
            saturation: Level::MAX,
            value: Level::MAX,
        }
    }
}

impl fmt::Display for HsvColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HSV({}, {}, {})",
            self.hue.degrees(),
            self.saturation.value(),
            self.value.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_bounds() {
        assert!(Hue::new(360).is_ok());
        assert!(matches!(Hue::new(361), Err(ValueError::InvalidHue(361))));
        assert_eq!(Hue::clamped(500).degrees(), 360);
    }

    #[test]
    fn colour_rejects_out_of_range_saturation() {
        assert!(matches!(
            HsvColour::new(120, 1001, 0),
            Err(ValueError::OutOfRange { actual: 1001, .. })
        ));
    }

    #[test]
    fn with_hue_saturation_keeps_value() {
        let colour = HsvColour::new(10, 20, 700).unwrap();
        let moved = colour.with_hue_saturation(Hue::new(200).unwrap(), Level::new(900).unwrap());
        assert_eq!(moved.hue.degrees(), 200);
        assert_eq!(moved.saturation.value(), 900);
        assert_eq!(moved.value.value(), 700);
    }

    #[test]
    fn colour_json_shape() {
        let colour = HsvColour::new(300, 800, 500).unwrap();
        let json = serde_json::to_value(colour).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hue": 300, "saturation": 800, "value": 500})
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            HsvColour::new(1, 2, 3).unwrap().to_string(),
            "HSV(1, 2, 3)"
        );
    }
}
