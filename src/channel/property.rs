// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device properties and their values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::{HsvColour, Hue, Level, WorkMode};

/// A named data point exposed by the lamp.
///
/// # Examples
///
/// ```
/// use lampcore::channel::Property;
///
/// assert_eq!(Property::ColourData.code(), "colour_data");
/// assert_eq!("dev_name_2".parse::<Property>().unwrap(), Property::DeviceName(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    /// Main switch.
    SwitchLed,
    /// Work mode enum.
    WorkMode,
    /// White brightness.
    BrightValue,
    /// White temperature.
    TempValue,
    /// Colour channel.
    ColourData,
    /// Real-time preview payload, not persisted by the lamp.
    ControlData,
    /// Scene playback payload.
    SceneData,
    /// Music-reactive payload.
    MusicData,
    /// Selected sub-lamp of a multi-lamp fixture.
    SelectedDevice,
    /// Display name of a sub-lamp (slots 1-3).
    DeviceName(u8),
}

impl Property {
    /// Number of sub-lamp name slots of a fixture.
    pub const NAME_SLOTS: u8 = 3;

    /// Returns the data-point code of the property.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::DeviceName(slot) => format!("dev_name_{slot}"),
            fixed => fixed.static_code().unwrap_or_default().to_string(),
        }
    }

    fn static_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::SwitchLed => "switch_led",
            Self::WorkMode => "work_mode",
            Self::BrightValue => "bright_value",
            Self::TempValue => "temp_value",
            Self::ColourData => "colour_data",
            Self::ControlData => "control_data",
            Self::SceneData => "scene_data",
            Self::MusicData => "music_data",
            Self::SelectedDevice => "selected_device",
            Self::DeviceName(_) => return None,
        })
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Property {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ValueError::UnknownVariant {
            kind: "property",
            value: s.to_string(),
        };
        Ok(match s {
            "switch_led" => Self::SwitchLed,
            "work_mode" => Self::WorkMode,
            "bright_value" => Self::BrightValue,
            "temp_value" => Self::TempValue,
            "colour_data" => Self::ColourData,
            "control_data" => Self::ControlData,
            "scene_data" => Self::SceneData,
            "music_data" => Self::MusicData,
            "selected_device" => Self::SelectedDevice,
            other => {
                let slot = other
                    .strip_prefix("dev_name_")
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=Self::NAME_SLOTS).contains(n))
                    .ok_or_else(unknown)?;
                Self::DeviceName(slot)
            }
        })
    }
}

/// The value carried by a property read or write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Boolean switch.
    Bool(bool),
    /// Channel level.
    Level(Level),
    /// Work mode.
    WorkMode(WorkMode),
    /// Colour payload.
    Colour(HsvColour),
    /// Preview payload.
    Control(ControlData),
    /// Free text (names, selected sub-lamp id).
    Text(String),
}

impl PropertyValue {
    /// Returns the boolean, if this is a switch value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the level, if this is a level value.
    #[must_use]
    pub fn as_level(&self) -> Option<Level> {
        match self {
            Self::Level(level) => Some(*level),
            _ => None,
        }
    }

    /// Returns the work mode, if this is a work mode value.
    #[must_use]
    pub fn as_work_mode(&self) -> Option<WorkMode> {
        match self {
            Self::WorkMode(mode) => Some(*mode),
            _ => None,
        }
    }

    /// Returns the colour, if this is a colour value.
    #[must_use]
    pub fn as_colour(&self) -> Option<HsvColour> {
        match self {
            Self::Colour(colour) => Some(*colour),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Decodes the wire text a transport received for a property.
    ///
    /// Switches accept `true`/`false` or `1`/`0`, levels are decimal and
    /// `control_data` uses the [`ControlData`] hex form. Colour, scene and
    /// music payloads arrive structured and have no text form.
    ///
    /// # Errors
    ///
    /// Returns a `ValueError` if the text does not decode to a valid value
    /// for the property.
    pub fn decode(property: Property, raw: &str) -> Result<Self, ValueError> {
        let text = raw.trim();
        let unknown = |kind: &'static str| ValueError::UnknownVariant {
            kind,
            value: text.to_string(),
        };
        Ok(match property {
            Property::SwitchLed => match text {
                "true" | "1" => Self::Bool(true),
                "false" | "0" => Self::Bool(false),
                _ => return Err(unknown("switch value")),
            },
            Property::WorkMode => Self::WorkMode(text.parse()?),
            Property::BrightValue | Property::TempValue => {
                let value = text.parse::<u16>().map_err(|_| unknown("level"))?;
                Self::Level(Level::new(value)?)
            }
            Property::ControlData => Self::Control(ControlData::parse(text)?),
            Property::SelectedDevice | Property::DeviceName(_) => Self::Text(raw.to_string()),
            Property::ColourData | Property::SceneData | Property::MusicData => {
                return Err(ValueError::UnknownVariant {
                    kind: "text-coded property",
                    value: property.code(),
                });
            }
        })
    }
}

/// Real-time preview payload carrying colour and white values together.
///
/// The lamp renders it immediately without persisting it, which makes it the
/// right target for move-phase writes. On the wire it is a version digit `1`
/// followed by hue, saturation, value, bright and temp as 4-digit hex words.
///
/// # Examples
///
/// ```
/// use lampcore::channel::ControlData;
/// use lampcore::types::HsvColour;
///
/// let data = ControlData::colour(HsvColour::new(300, 800, 500).unwrap());
/// assert_eq!(data.encode(), "1012c032001f400000000");
/// assert_eq!(ControlData::parse(&data.encode()).unwrap(), data);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlData {
    /// Colour hue.
    pub hue: Hue,
    /// Colour saturation.
    pub saturation: Level,
    /// Colour value.
    pub value: Level,
    /// White brightness.
    pub bright: Level,
    /// White temperature.
    pub temp: Level,
}

impl Default for ControlData {
    fn default() -> Self {
        Self {
            hue: Hue::clamped(Hue::MAX),
            saturation: Level::MAX,
            value: Level::MAX,
            bright: Level::MIN,
            temp: Level::MIN,
        }
    }
}

impl ControlData {
    const ENCODED_LEN: usize = 21;
    const VERSION: char = '1';

    /// Creates a colour-only preview (white fields zeroed).
    #[must_use]
    pub fn colour(colour: HsvColour) -> Self {
        Self {
            hue: colour.hue,
            saturation: colour.saturation,
            value: colour.value,
            bright: Level::MIN,
            temp: Level::MIN,
        }
    }

    /// Creates a white-only preview (colour fields zeroed).
    #[must_use]
    pub fn white(bright: Level, temp: Level) -> Self {
        Self {
            hue: Hue::clamped(0),
            saturation: Level::MIN,
            value: Level::MIN,
            bright,
            temp,
        }
    }

    /// Encodes the payload into its hex wire form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}{:04x}{:04x}{:04x}{:04x}{:04x}",
            Self::VERSION,
            self.hue.degrees(),
            self.saturation.value(),
            self.value.value(),
            self.bright.value(),
            self.temp.value()
        )
    }

    /// Decodes a hex wire payload.
    ///
    /// An empty or truncated payload decodes to the default preview, which is
    /// what the lamp reports before any preview was sent.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::MalformedControlData` for an overlong payload or
    /// one with non-hex words, and range errors for out-of-range words.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        if raw.len() < Self::ENCODED_LEN {
            return Ok(Self::default());
        }
        if raw.len() > Self::ENCODED_LEN || !raw.is_ascii() {
            return Err(ValueError::MalformedControlData(raw.to_string()));
        }

        let word = |index: usize| -> Result<u16, ValueError> {
            let start = 1 + index * 4;
            u16::from_str_radix(&raw[start..start + 4], 16)
                .map_err(|_| ValueError::MalformedControlData(raw.to_string()))
        };

        Ok(Self {
            hue: Hue::new(word(0)?)?,
            saturation: Level::new(word(1)?)?,
            value: Level::new(word(2)?)?,
            bright: Level::new(word(3)?)?,
            temp: Level::new(word(4)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_codes_parse_back() {
        for property in [
            Property::SwitchLed,
            Property::WorkMode,
            Property::BrightValue,
            Property::TempValue,
            Property::ColourData,
            Property::ControlData,
            Property::SceneData,
            Property::MusicData,
            Property::SelectedDevice,
            Property::DeviceName(1),
            Property::DeviceName(3),
        ] {
            assert_eq!(property.code().parse::<Property>().unwrap(), property);
        }
    }

    #[test]
    fn device_name_slot_out_of_range_rejected() {
        assert!("dev_name_4".parse::<Property>().is_err());
        assert!("dev_name_0".parse::<Property>().is_err());
        assert!("brightness".parse::<Property>().is_err());
    }

    #[test]
    fn control_data_white_encoding() {
        let data = ControlData::white(Level::new(1000).unwrap(), Level::new(500).unwrap());
        assert_eq!(data.encode(), "10000000000003e801f4");
    }

    #[test]
    fn control_data_empty_is_default() {
        let data = ControlData::parse("").unwrap();
        assert_eq!(data.hue.degrees(), 360);
        assert_eq!(data.saturation, Level::MAX);
        assert_eq!(data.bright, Level::MIN);
    }

    #[test]
    fn control_data_short_is_default() {
        assert_eq!(ControlData::parse("10000").unwrap(), ControlData::default());
        assert_eq!(
            ControlData::parse("1012c032001f40000000").unwrap(),
            ControlData::default()
        );
    }

    #[test]
    fn control_data_rejects_garbage() {
        assert!(matches!(
            ControlData::parse("1zzzz0000000000000000"),
            Err(ValueError::MalformedControlData(_))
        ));
        assert!(matches!(
            ControlData::parse("1012c032001f4000000000"),
            Err(ValueError::MalformedControlData(_))
        ));
        // hue word 0x0fff is out of range
        assert!(matches!(
            ControlData::parse("10fff0000000000000000"),
            Err(ValueError::InvalidHue(4095))
        ));
    }

    #[test]
    fn decode_wire_text() {
        assert_eq!(
            PropertyValue::decode(Property::SwitchLed, "1").unwrap(),
            PropertyValue::Bool(true)
        );
        assert_eq!(
            PropertyValue::decode(Property::WorkMode, "colour").unwrap(),
            PropertyValue::WorkMode(WorkMode::Colour)
        );
        assert_eq!(
            PropertyValue::decode(Property::TempValue, " 250 ").unwrap(),
            PropertyValue::Level(Level::new(250).unwrap())
        );
        assert_eq!(
            PropertyValue::decode(Property::ControlData, "").unwrap(),
            PropertyValue::Control(ControlData::default())
        );
        assert_eq!(
            PropertyValue::decode(Property::DeviceName(1), "Desk").unwrap(),
            PropertyValue::Text("Desk".to_string())
        );
    }

    #[test]
    fn decode_rejects_bad_wire_text() {
        assert!(PropertyValue::decode(Property::SwitchLed, "on").is_err());
        assert!(matches!(
            PropertyValue::decode(Property::BrightValue, "1001"),
            Err(ValueError::OutOfRange { actual: 1001, .. })
        ));
        assert!(PropertyValue::decode(Property::BrightValue, "-5").is_err());
        assert!(PropertyValue::decode(Property::ColourData, "0000").is_err());
    }

    #[test]
    fn property_value_accessors() {
        assert_eq!(PropertyValue::Bool(true).as_bool(), Some(true));
        assert_eq!(PropertyValue::Bool(true).as_level(), None);
        assert_eq!(
            PropertyValue::WorkMode(WorkMode::Music).as_work_mode(),
            Some(WorkMode::Music)
        );
        assert_eq!(
            PropertyValue::Text("Device1".to_string()).as_text(),
            Some("Device1")
        );
    }
}
