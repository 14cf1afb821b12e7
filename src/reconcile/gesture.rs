// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated gesture input.

use crate::error::ValueError;
use crate::types::{Hue, Level};

/// Coordinates reported by a UI control.
///
/// UI toolkits report floating-point coordinates. They are validated here,
/// once: non-finite values are rejected and out-of-range values are clamped
/// onto the channel scale.
///
/// # Examples
///
/// ```
/// use lampcore::reconcile::GestureInput;
///
/// assert_eq!(GestureInput::slider(1200.0).level().unwrap().value(), 1000);
/// assert!(GestureInput::slider(f64::NAN).level().is_err());
///
/// let (hue, saturation) = GestureInput::wheel(300.4, 799.6).hue_saturation().unwrap();
/// assert_eq!((hue.degrees(), saturation.value()), (300, 800));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    /// A linear slider on the 0-1000 scale.
    Slider {
        /// Slider position.
        value: f64,
    },
    /// A colour wheel position.
    Wheel {
        /// Angle in degrees (0-360).
        hue: f64,
        /// Distance from the centre on the 0-1000 scale.
        saturation: f64,
    },
}

impl GestureInput {
    /// Creates slider input.
    #[must_use]
    pub fn slider(value: f64) -> Self {
        Self::Slider { value }
    }

    /// Creates colour wheel input.
    #[must_use]
    pub fn wheel(hue: f64, saturation: f64) -> Self {
        Self::Wheel { hue, saturation }
    }

    /// Returns the slider position as a level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` for NaN or infinite input and
    /// `ValueError::UnknownVariant` for wheel input.
    pub fn level(&self) -> Result<Level, ValueError> {
        match self {
            Self::Slider { value } => Ok(Level::clamped(to_scale(*value, Level::MAX.value())?)),
            Self::Wheel { .. } => Err(mismatch("wheel")),
        }
    }

    /// Returns the wheel position as hue and saturation.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::NotFinite` for NaN or infinite input and
    /// `ValueError::UnknownVariant` for slider input.
    pub fn hue_saturation(&self) -> Result<(Hue, Level), ValueError> {
        match self {
            Self::Wheel { hue, saturation } => Ok((
                Hue::clamped(to_scale(*hue, Hue::MAX)?),
                Level::clamped(to_scale(*saturation, Level::MAX.value())?),
            )),
            Self::Slider { .. } => Err(mismatch("slider")),
        }
    }
}

fn mismatch(kind: &str) -> ValueError {
    ValueError::UnknownVariant {
        kind: "gesture input",
        value: kind.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_scale(raw: f64, max: u16) -> Result<u16, ValueError> {
    if !raw.is_finite() {
        return Err(ValueError::NotFinite);
    }
    // clamped into u16 range before the cast
    Ok(raw.round().clamp(0.0, f64::from(max)) as u16)
}
