// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lamp channel capabilities.
//!
//! Lamps come in several channel-count variants. Lower variants lack some
//! properties (a CW lamp has no colour channel, an RGB lamp no white
//! channel), which decides both which writes may be dispatched and which
//! stock scenes make sense for the lamp.
//!
//! # Detection
//!
//! Capabilities are detected from a channel's capability query with
//! [`LampCapabilities::from_channel`].
//!
//! # Manual Configuration
//!
//! When no channel is connected yet, capabilities can be specified using the
//! builder pattern.

use crate::channel::{Property, PropertyChannel};

/// Channel-count profile of a lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LampProfile {
    /// Colour plus tunable white.
    Rgbcw,
    /// Colour only.
    Rgb,
    /// Tunable white only.
    Cw,
}

/// Capabilities of a lamp.
///
/// # Examples
///
/// ```
/// use lampcore::{LampCapabilities, LampProfile};
///
/// let full = LampCapabilities::rgbcw();
/// assert_eq!(full.profile(), LampProfile::Rgbcw);
///
/// let strip = LampCapabilities::builder().with_colour().build();
/// assert_eq!(strip.profile(), LampProfile::Rgb);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
// Each flag mirrors one independent lamp property.
#[allow(clippy::struct_excessive_bools)]
pub struct LampCapabilities {
    /// Exposes the colour channel.
    pub colour: bool,

    /// Exposes white brightness.
    pub brightness: bool,

    /// Exposes white temperature.
    pub temperature: bool,

    /// Exposes the real-time preview payload.
    pub preview: bool,
}

impl Default for LampCapabilities {
    fn default() -> Self {
        Self::rgbcw()
    }
}

impl LampCapabilities {
    /// Creates capabilities for a full colour plus tunable white lamp.
    #[must_use]
    pub const fn rgbcw() -> Self {
        Self {
            colour: true,
            brightness: true,
            temperature: true,
            preview: true,
        }
    }

    /// Creates capabilities for a colour-only lamp.
    #[must_use]
    pub const fn rgb() -> Self {
        Self {
            colour: true,
            brightness: false,
            temperature: false,
            preview: true,
        }
    }

    /// Creates capabilities for a tunable white lamp.
    #[must_use]
    pub const fn cw() -> Self {
        Self {
            colour: false,
            brightness: true,
            temperature: true,
            preview: false,
        }
    }

    /// Detects capabilities from a channel's capability query.
    #[must_use]
    pub fn from_channel(channel: &dyn PropertyChannel) -> Self {
        Self {
            colour: channel.is_supported(Property::ColourData),
            brightness: channel.is_supported(Property::BrightValue),
            temperature: channel.is_supported(Property::TempValue),
            preview: channel.is_supported(Property::ControlData),
        }
    }

    /// Returns a builder starting from no capabilities.
    #[must_use]
    pub fn builder() -> LampCapabilitiesBuilder {
        LampCapabilitiesBuilder::new()
    }

    /// Returns the channel-count profile.
    ///
    /// A colour lamp with any white channel counts as RGBCW.
    #[must_use]
    pub const fn profile(&self) -> LampProfile {
        match (self.colour, self.brightness || self.temperature) {
            (true, true) => LampProfile::Rgbcw,
            (true, false) => LampProfile::Rgb,
            (false, _) => LampProfile::Cw,
        }
    }

    /// Returns `true` if the lamp has any white channel.
    #[must_use]
    pub const fn has_white(&self) -> bool {
        self.brightness || self.temperature
    }
}

/// Builder for [`LampCapabilities`].
#[derive(Debug)]
pub struct LampCapabilitiesBuilder {
    capabilities: LampCapabilities,
}

impl LampCapabilitiesBuilder {
    /// Creates a builder with every capability disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capabilities: LampCapabilities {
                colour: false,
                brightness: false,
                temperature: false,
                preview: false,
            },
        }
    }

    /// Enables the colour channel.
    #[must_use]
    pub fn with_colour(mut self) -> Self {
        self.capabilities.colour = true;
        self
    }

    /// Enables white brightness.
    #[must_use]
    pub fn with_brightness(mut self) -> Self {
        self.capabilities.brightness = true;
        self
    }

    /// Enables white temperature.
    #[must_use]
    pub fn with_temperature(mut self) -> Self {
        self.capabilities.temperature = true;
        self
    }

    /// Enables the preview payload.
    #[must_use]
    pub fn with_preview(mut self) -> Self {
        self.capabilities.preview = true;
        self
    }

    /// Builds the capabilities.
    #[must_use]
    pub fn build(self) -> LampCapabilities {
        self.capabilities
    }
}

impl Default for LampCapabilitiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;

    #[test]
    fn default_is_rgbcw() {
        let caps = LampCapabilities::default();
        assert!(caps.colour);
        assert!(caps.has_white());
        assert_eq!(caps.profile(), LampProfile::Rgbcw);
    }

    #[test]
    fn preset_profiles() {
        assert_eq!(LampCapabilities::rgb().profile(), LampProfile::Rgb);
        assert_eq!(LampCapabilities::cw().profile(), LampProfile::Cw);
    }

    #[test]
    fn builder_pattern() {
        let caps = LampCapabilities::builder()
            .with_colour()
            .with_brightness()
            .build();
        assert!(caps.colour);
        assert!(caps.brightness);
        assert!(!caps.temperature);
        assert!(!caps.preview);
        assert_eq!(caps.profile(), LampProfile::Rgbcw);
    }

    #[test]
    fn builder_without_colour_is_cw() {
        let caps = LampCapabilities::builder().with_temperature().build();
        assert_eq!(caps.profile(), LampProfile::Cw);
    }

    #[test]
    fn from_channel_detects_missing_colour() {
        let channel = MemoryChannel::new()
            .without(Property::ColourData)
            .without(Property::ControlData);
        let caps = LampCapabilities::from_channel(&channel);
        assert!(!caps.colour);
        assert!(!caps.preview);
        assert_eq!(caps.profile(), LampProfile::Cw);
    }

    #[test]
    fn from_channel_detects_rgb_strip() {
        let channel = MemoryChannel::new()
            .without(Property::BrightValue)
            .without(Property::TempValue);
        assert_eq!(
            LampCapabilities::from_channel(&channel).profile(),
            LampProfile::Rgb
        );
    }
}
