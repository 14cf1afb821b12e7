// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Permille level type used by every lamp channel.
//!
//! Brightness, white temperature, colour saturation and colour value are all
//! reported by the lamp on the same 0-1000 scale. A single validated type
//! keeps them from leaking out of range anywhere in the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Warmest white temperature the lamp can produce, in Kelvin.
pub const KELVIN_WARM: u16 = 2700;

/// Coolest white temperature the lamp can produce, in Kelvin.
pub const KELVIN_COOL: u16 = 6500;

/// A channel level on the 0-1000 scale.
///
/// # Examples
///
/// ```
/// use lampcore::types::Level;
///
/// let half = Level::new(500).unwrap();
/// assert_eq!(half.value(), 500);
/// assert_eq!(half.percent(), 50);
///
/// assert!(Level::new(1001).is_err());
/// assert_eq!(Level::clamped(4000), Level::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Level(u16);

impl Level {
    /// Lowest level.
    pub const MIN: Self = Self(0);

    /// Highest level.
    pub const MAX: Self = Self(1000);

    /// Creates a new level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 1000.
    pub fn new(value: u16) -> Result<Self, ValueError> {
        if value > Self::MAX.0 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::MAX.0,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Creates a level, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u16) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Returns the raw level.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the level as a rounded percentage (0-100).
    #[must_use]
    pub fn percent(&self) -> u8 {
        // Safe: 0..=1000 rounds to 0..=100
        #[allow(clippy::cast_possible_truncation)]
        let percent = ((u32::from(self.0) + 5) / 10) as u8;
        percent
    }

    /// Interprets the level as a white temperature and returns it in Kelvin.
    ///
    /// 0 maps to 2700 K and 1000 maps to 6500 K.
    #[must_use]
    pub fn to_kelvin(&self) -> u16 {
        let span = u32::from(KELVIN_COOL - KELVIN_WARM);
        // Safe: result is bounded by KELVIN_COOL
        #[allow(clippy::cast_possible_truncation)]
        let offset = ((u32::from(self.0) * span + 500) / 1000) as u16;
        KELVIN_WARM + offset
    }

    /// Returns the absolute difference between two levels.
    #[must_use]
    pub const fn abs_diff(&self, other: Self) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}‰", self.0)
    }
}

impl TryFrom<u16> for Level {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u16 {
    fn from(level: Level) -> Self {
        level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bounds() {
        assert!(Level::new(0).is_ok());
        assert!(Level::new(1000).is_ok());
        assert!(matches!(
            Level::new(1001),
            Err(ValueError::OutOfRange { actual: 1001, .. })
        ));
    }

    #[test]
    fn level_clamped() {
        assert_eq!(Level::clamped(999).value(), 999);
        assert_eq!(Level::clamped(1200).value(), 1000);
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(Level::new(0).unwrap().percent(), 0);
        assert_eq!(Level::new(804).unwrap().percent(), 80);
        assert_eq!(Level::new(805).unwrap().percent(), 81);
        assert_eq!(Level::MAX.percent(), 100);
    }

    #[test]
    fn kelvin_mapping() {
        assert_eq!(Level::MIN.to_kelvin(), 2700);
        assert_eq!(Level::MAX.to_kelvin(), 6500);
        assert_eq!(Level::new(500).unwrap().to_kelvin(), 4600);
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Level>("1001").is_err());
        assert_eq!(serde_json::from_str::<Level>("42").unwrap().value(), 42);
        assert_eq!(serde_json::to_string(&Level::MAX).unwrap(), "1000");
    }
}
