// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Saved scene records.
//!
//! The field names serialize in camelCase, which is the layout of the
//! persisted blob. Fields added after the first release (`isFavorite`,
//! `customImage`, `category`, `fadeTime`, `delayTime`) are optional in the
//! blob so older libraries still load.

use serde::{Deserialize, Serialize};

use super::SceneId;
use crate::error::SceneError;
use crate::types::{DimmingTime, HsvColour, Hue, Level, LightMode};

/// Maximum number of characters of a scene name.
pub const MAX_NAME_CHARS: usize = 20;

/// Image shown for scenes without a custom picture.
pub const DEFAULT_IMAGE: &str = "/images/scene/generic.png";

/// Validates a user-entered scene name.
///
/// Returns the trimmed name.
///
/// # Errors
///
/// Returns `SceneError::EmptyName` for a blank name and
/// `SceneError::NameTooLong` for a name over [`MAX_NAME_CHARS`] characters.
///
/// # Examples
///
/// ```
/// use lampcore::scene::validate_name;
///
/// assert_eq!(validate_name("  Evening ").unwrap(), "Evening");
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(raw: &str) -> Result<String, SceneError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SceneError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(SceneError::NameTooLong {
            max: MAX_NAME_CHARS,
        });
    }
    Ok(name.to_string())
}

/// Library section a scene is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneCategory {
    /// Static lighting scene.
    #[default]
    Scene,
    /// Music-reactive scene.
    Music,
}

/// Stored snapshot of one lamp within a scene.
///
/// Only the values of `mode` are meaningful on activation: a white entry
/// uses `brightness`/`temperature`, a colour entry uses
/// `hue`/`saturation`/`value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDeviceState {
    /// Identity of the lamp.
    pub device_id: String,
    /// Display name at the time of saving.
    pub device_name: String,
    /// Output mode.
    pub mode: LightMode,
    /// White brightness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<Level>,
    /// White temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Level>,
    /// Colour hue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<Hue>,
    /// Colour saturation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<Level>,
    /// Colour value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Level>,
    /// Fade envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_time: Option<DimmingTime>,
    /// Delay envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_time: Option<DimmingTime>,
}

impl SavedDeviceState {
    /// Creates a white-mode entry.
    #[must_use]
    pub fn white(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        brightness: Level,
        temperature: Level,
    ) -> Self {
        Self {
            brightness: Some(brightness),
            temperature: Some(temperature),
            ..Self::empty(device_id.into(), device_name.into(), LightMode::White)
        }
    }

    /// Creates a colour-mode entry.
    #[must_use]
    pub fn colour(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        colour: HsvColour,
    ) -> Self {
        Self {
            hue: Some(colour.hue),
            saturation: Some(colour.saturation),
            value: Some(colour.value),
            ..Self::empty(device_id.into(), device_name.into(), LightMode::Colour)
        }
    }

    fn empty(device_id: String, device_name: String, mode: LightMode) -> Self {
        Self {
            device_id,
            device_name,
            mode,
            brightness: None,
            temperature: None,
            hue: None,
            saturation: None,
            value: None,
            fade_time: None,
            delay_time: None,
        }
    }

    /// Sets the fade envelope.
    #[must_use]
    pub fn with_fade(mut self, fade: DimmingTime) -> Self {
        self.fade_time = Some(fade);
        self
    }

    /// Sets the delay envelope.
    #[must_use]
    pub fn with_delay(mut self, delay: DimmingTime) -> Self {
        self.delay_time = Some(delay);
        self
    }

    /// Returns the colour to reproduce, if this is a colour entry with a hue.
    ///
    /// Missing saturation or value default to full.
    #[must_use]
    pub fn colour_payload(&self) -> Option<HsvColour> {
        if self.mode != LightMode::Colour {
            return None;
        }
        let hue = self.hue?;
        Some(HsvColour {
            hue,
            saturation: self.saturation.unwrap_or(Level::MAX),
            value: self.value.unwrap_or(Level::MAX),
        })
    }

    /// Returns the white values to reproduce, if this is a white entry with a
    /// brightness.
    #[must_use]
    pub fn white_payload(&self) -> Option<(Level, Option<Level>)> {
        if self.mode != LightMode::White {
            return None;
        }
        Some((self.brightness?, self.temperature))
    }
}

/// A stored scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScene {
    /// Unique id.
    pub id: SceneId,
    /// Display name.
    pub name: String,
    /// Creation time in unix milliseconds.
    pub created_at: i64,
    /// Whether activation applies to every entry or only the selected lamp.
    pub is_multi_device: bool,
    /// Lamp snapshots, never empty.
    pub devices: Vec<SavedDeviceState>,
    /// Listed among favourites.
    #[serde(default)]
    pub is_favorite: bool,
    /// Card picture.
    #[serde(default = "default_image")]
    pub custom_image: String,
    /// Library section.
    #[serde(default)]
    pub category: SceneCategory,
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

impl SavedScene {
    /// Returns the entry of a lamp.
    #[must_use]
    pub fn device(&self, device_id: &str) -> Option<&SavedDeviceState> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    /// Returns `true` for music-reactive scenes.
    #[must_use]
    pub fn is_music(&self) -> bool {
        self.category == SceneCategory::Music
    }

    /// Applies a patch, validating it first.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::NoDevices` for an empty device list and
    /// `SceneError::EmptyName` for a blank name. The scene is unchanged on
    /// error.
    pub fn apply(&mut self, patch: ScenePatch) -> Result<(), SceneError> {
        if patch.devices.as_ref().is_some_and(Vec::is_empty) {
            return Err(SceneError::NoDevices);
        }
        if patch.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(SceneError::EmptyName);
        }

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(multi) = patch.is_multi_device {
            self.is_multi_device = multi;
        }
        if let Some(devices) = patch.devices {
            self.devices = devices;
        }
        if let Some(favorite) = patch.is_favorite {
            self.is_favorite = favorite;
        }
        if let Some(image) = patch.custom_image {
            self.custom_image = image;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        Ok(())
    }
}

/// A scene as submitted by the editor, before id and timestamp exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneDraft {
    /// Display name.
    pub name: String,
    /// Whether activation applies to every entry.
    pub is_multi_device: bool,
    /// Lamp snapshots.
    pub devices: Vec<SavedDeviceState>,
    /// Listed among favourites.
    pub is_favorite: bool,
    /// Card picture, the generic image if `None`.
    pub custom_image: Option<String>,
    /// Library section.
    pub category: SceneCategory,
}

impl SceneDraft {
    /// Creates a single-device scene draft.
    #[must_use]
    pub fn new(name: impl Into<String>, devices: Vec<SavedDeviceState>) -> Self {
        Self {
            name: name.into(),
            is_multi_device: false,
            devices,
            is_favorite: false,
            custom_image: None,
            category: SceneCategory::Scene,
        }
    }

    /// Applies the scene to every entry on activation.
    #[must_use]
    pub fn multi_device(mut self) -> Self {
        self.is_multi_device = true;
        self
    }

    /// Marks the scene as favourite.
    #[must_use]
    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    /// Sets the library section.
    #[must_use]
    pub fn with_category(mut self, category: SceneCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the card picture.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.custom_image = Some(image.into());
        self
    }

    pub(crate) fn into_scene(self, id: SceneId, created_at: i64) -> SavedScene {
        SavedScene {
            id,
            name: self.name,
            created_at,
            is_multi_device: self.is_multi_device,
            devices: self.devices,
            is_favorite: self.is_favorite,
            custom_image: self.custom_image.unwrap_or_else(default_image),
            category: self.category,
        }
    }
}

/// Partial update of a scene; `None` fields are left untouched.
///
/// Id and creation time cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenePatch {
    /// New name.
    pub name: Option<String>,
    /// New multi-device flag.
    pub is_multi_device: Option<bool>,
    /// New device list.
    pub devices: Option<Vec<SavedDeviceState>>,
    /// New favourite flag.
    pub is_favorite: Option<bool>,
    /// New card picture.
    pub custom_image: Option<String>,
    /// New library section.
    pub category: Option<SceneCategory>,
}

impl ScenePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the multi-device flag.
    #[must_use]
    pub fn multi_device(mut self, multi: bool) -> Self {
        self.is_multi_device = Some(multi);
        self
    }

    /// Replaces the device list.
    #[must_use]
    pub fn devices(mut self, devices: Vec<SavedDeviceState>) -> Self {
        self.devices = Some(devices);
        self
    }

    /// Sets the favourite flag.
    #[must_use]
    pub fn favorite(mut self, favorite: bool) -> Self {
        self.is_favorite = Some(favorite);
        self
    }

    /// Sets the card picture.
    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.custom_image = Some(image.into());
        self
    }

    /// Sets the library section.
    #[must_use]
    pub fn category(mut self, category: SceneCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
