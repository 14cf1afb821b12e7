// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in default scenes and the load-time merge rule.

use std::collections::HashSet;

use super::{PRESET_PREFIX, SavedDeviceState, SavedScene, SceneCategory, SceneId};
use crate::capabilities::LampProfile;
use crate::types::{HsvColour, Hue, Level};

/// Sub-lamp ids of a multi-lamp fixture, as reported by `selected_device`.
pub const FIXTURE_DEVICES: [&str; 3] = ["Device1", "Device2", "Device3"];

/// Returns the stock scenes for a lamp profile.
///
/// Every stock scene covers all sub-lamps of the fixture and carries an id
/// starting with the reserved preset prefix.
#[must_use]
pub fn default_scenes(profile: LampProfile) -> Vec<SavedScene> {
    match profile {
        LampProfile::Rgbcw => vec![
            white("reading", "Reading", 1000, 1000),
            white("night", "Night", 100, 0),
            colour("sunset", "Sunset", 30, 1000, 800),
            colour("ocean", "Ocean", 200, 900, 700),
            music("party", "Party", 300),
        ],
        LampProfile::Rgb => vec![
            colour("sunset", "Sunset", 30, 1000, 800),
            colour("ocean", "Ocean", 200, 900, 700),
            colour("forest", "Forest", 120, 800, 600),
            music("party", "Party", 300),
        ],
        LampProfile::Cw => vec![
            white("reading", "Reading", 1000, 1000),
            white("relax", "Relax", 600, 300),
            white("night", "Night", 100, 0),
        ],
    }
}

/// Merges the stock scenes into a persisted library.
///
/// Persisted entries come first and take precedence. A stock scene is
/// appended when its id carries the preset prefix, is not already present,
/// and the library is still under `capacity`.
#[must_use]
pub fn merge_defaults(
    persisted: Vec<SavedScene>,
    defaults: &[SavedScene],
    capacity: usize,
) -> Vec<SavedScene> {
    let mut merged = persisted;
    let mut present: HashSet<SceneId> = merged.iter().map(|s| s.id.clone()).collect();

    for scene in defaults {
        if merged.len() >= capacity {
            break;
        }
        if !scene.id.as_str().starts_with(PRESET_PREFIX) || present.contains(&scene.id) {
            continue;
        }
        present.insert(scene.id.clone());
        merged.push(scene.clone());
    }
    merged
}

fn preset(slug: &str, name: &str, state: impl Fn(&str) -> SavedDeviceState) -> SavedScene {
    SavedScene {
        id: SceneId::preset(slug),
        name: name.to_string(),
        created_at: 0,
        is_multi_device: true,
        devices: FIXTURE_DEVICES.iter().map(|id| state(id)).collect(),
        is_favorite: false,
        custom_image: format!("/images/scene/{slug}.png"),
        category: SceneCategory::Scene,
    }
}

fn white(slug: &str, name: &str, brightness: u16, temperature: u16) -> SavedScene {
    preset(slug, name, |id| {
        SavedDeviceState::white(id, id, Level::clamped(brightness), Level::clamped(temperature))
    })
}

fn colour(slug: &str, name: &str, hue: u16, saturation: u16, value: u16) -> SavedScene {
    let colour = HsvColour {
        hue: Hue::clamped(hue),
        saturation: Level::clamped(saturation),
        value: Level::clamped(value),
    };
    preset(slug, name, |id| SavedDeviceState::colour(id, id, colour))
}

fn music(slug: &str, name: &str, hue: u16) -> SavedScene {
    SavedScene {
        category: SceneCategory::Music,
        ..colour(slug, name, hue, 1000, 1000)
    }
}
