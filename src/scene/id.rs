// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene identifier type.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id prefix reserved for the built-in default scenes.
pub const PRESET_PREFIX: &str = "preset_";

const GENERATED_PREFIX: &str = "scene_";
const RANDOM_CHARS: usize = 9;

/// Identifier of a saved scene.
///
/// Generated ids have the form `scene_<unix-millis>_<9 random chars>`.
/// Ids of the built-in default scenes start with [`PRESET_PREFIX`].
///
/// # Examples
///
/// ```
/// use lampcore::scene::SceneId;
///
/// let id = SceneId::generate();
/// assert!(id.as_str().starts_with("scene_"));
/// assert!(!id.is_preset());
///
/// assert!(SceneId::preset("reading").is_preset());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    /// Creates a fresh id for a user-created scene.
    #[must_use]
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{GENERATED_PREFIX}{}_{}",
            Utc::now().timestamp_millis(),
            &random[..RANDOM_CHARS]
        ))
    }

    /// Creates the id of a built-in default scene.
    #[must_use]
    pub fn preset(name: &str) -> Self {
        Self(format!("{PRESET_PREFIX}{name}"))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the id of a built-in default scene.
    #[must_use]
    pub fn is_preset(&self) -> bool {
        self.0.starts_with(PRESET_PREFIX)
    }
}

impl fmt::Debug for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneId({})", self.0)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for SceneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_id_format() {
        let id = SceneId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "scene");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn generated_ids_differ() {
        let ids: HashSet<SceneId> = (0..100).map(|_| SceneId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn preset_prefix() {
        let id = SceneId::preset("night");
        assert_eq!(id.as_str(), "preset_night");
        assert!(id.is_preset());
        assert!(!SceneId::from("scene_1_abc").is_preset());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = SceneId::from("scene_1_abcdefghi");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"scene_1_abcdefghi\""
        );
    }
}
