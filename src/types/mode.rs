// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lamp output modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Which channel set of the lamp is producing light.
///
/// Both white and colour values are kept in storage; the mode selects which
/// of them is active.
///
/// # Examples
///
/// ```
/// use lampcore::types::LightMode;
///
/// assert_eq!(LightMode::Colour.as_str(), "colour");
/// assert_eq!("white".parse::<LightMode>().unwrap(), LightMode::White);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    /// Tunable white channels (brightness + temperature).
    #[default]
    White,
    /// RGB channels driven by an HSV colour.
    Colour,
}

impl LightMode {
    /// Returns the wire name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Colour => "colour",
        }
    }
}

impl fmt::Display for LightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Self::White),
            "colour" => Ok(Self::Colour),
            other => Err(ValueError::UnknownVariant {
                kind: "light mode",
                value: other.to_string(),
            }),
        }
    }
}

/// The lamp's work mode property.
///
/// `Scene` and `Music` are meta-modes layered over the white/colour output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    /// White output.
    #[default]
    White,
    /// Colour output.
    Colour,
    /// Scene playback.
    Scene,
    /// Music-reactive playback.
    Music,
}

impl WorkMode {
    /// Returns the wire name of the work mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Colour => "colour",
            Self::Scene => "scene",
            Self::Music => "music",
        }
    }

    /// Returns the light mode if this is a plain output mode.
    #[must_use]
    pub const fn light_mode(&self) -> Option<LightMode> {
        match self {
            Self::White => Some(LightMode::White),
            Self::Colour => Some(LightMode::Colour),
            Self::Scene | Self::Music => None,
        }
    }
}

impl From<LightMode> for WorkMode {
    fn from(mode: LightMode) -> Self {
        match mode {
            LightMode::White => Self::White,
            LightMode::Colour => Self::Colour,
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Self::White),
            "colour" => Ok(Self::Colour),
            "scene" => Ok(Self::Scene),
            "music" => Ok(Self::Music),
            other => Err(ValueError::UnknownVariant {
                kind: "work mode",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_mode_round_trip_through_str() {
        for mode in [
            WorkMode::White,
            WorkMode::Colour,
            WorkMode::Scene,
            WorkMode::Music,
        ] {
            assert_eq!(mode.as_str().parse::<WorkMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_mode_rejected() {
        let err = "color".parse::<LightMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown light mode: color");
    }

    #[test]
    fn meta_modes_have_no_light_mode() {
        assert_eq!(WorkMode::Scene.light_mode(), None);
        assert_eq!(WorkMode::Colour.light_mode(), Some(LightMode::Colour));
        assert_eq!(WorkMode::from(LightMode::White), WorkMode::White);
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&LightMode::Colour).unwrap(),
            "\"colour\""
        );
        assert_eq!(
            serde_json::from_str::<WorkMode>("\"music\"").unwrap(),
            WorkMode::Music
        );
    }
}
