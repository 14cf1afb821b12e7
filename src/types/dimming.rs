// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimming envelope durations.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Fade or delay time of a saved lamp state, in milliseconds (0-10000).
///
/// # Examples
///
/// ```
/// use lampcore::types::DimmingTime;
///
/// let fade = DimmingTime::new(1500).unwrap();
/// assert_eq!(fade.as_duration().as_millis(), 1500);
/// assert!(DimmingTime::new(10_001).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct DimmingTime(u16);

impl DimmingTime {
    /// Longest supported envelope.
    pub const MAX_MS: u16 = 10_000;

    /// Creates a new dimming time.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `millis` exceeds 10000.
    pub fn new(millis: u16) -> Result<Self, ValueError> {
        if millis > Self::MAX_MS {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::MAX_MS,
                actual: millis,
            });
        }
        Ok(Self(millis))
    }

    /// Returns the time in milliseconds.
    #[must_use]
    pub const fn millis(&self) -> u16 {
        self.0
    }

    /// Returns the time as a [`Duration`].
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.0))
    }
}

impl TryFrom<u16> for DimmingTime {
    type Error = ValueError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DimmingTime> for u16 {
    fn from(time: DimmingTime) -> Self {
        time.0
    }
}

impl fmt::Display for DimmingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert!(DimmingTime::new(0).is_ok());
        assert!(DimmingTime::new(10_000).is_ok());
        assert!(DimmingTime::new(10_001).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(DimmingTime::new(250).unwrap().to_string(), "250ms");
    }
}
