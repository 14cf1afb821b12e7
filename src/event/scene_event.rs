// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene library event types.

use crate::scene::SceneId;

/// Events emitted by the scene store and the activation engine.
///
/// Screens holding a receiver re-read the store when an event arrives
/// instead of polling it.
///
/// # Examples
///
/// ```
/// use lampcore::event::SceneEvent;
/// use lampcore::scene::SceneId;
///
/// let id = SceneId::from("scene_1_abcdefghi");
/// let added = SceneEvent::Added { id: id.clone() };
/// assert_eq!(added.scene_id(), Some(&id));
/// assert!(added.is_mutation());
///
/// assert_eq!(SceneEvent::Cleared.scene_id(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    /// A scene was added at the head of the library.
    Added {
        /// The new scene.
        id: SceneId,
    },

    /// A scene was changed.
    Updated {
        /// The changed scene.
        id: SceneId,
    },

    /// A scene was removed.
    Deleted {
        /// The removed scene.
        id: SceneId,
    },

    /// The library was replaced with a new ordering.
    Reordered {
        /// Number of scenes after the reorder.
        count: usize,
    },

    /// Every scene was removed.
    Cleared,

    /// A scene was reproduced on the lamps.
    Activated {
        /// The activated scene.
        id: SceneId,
    },
}

impl SceneEvent {
    /// Returns the scene this event is about, if it is about a single scene.
    #[must_use]
    pub fn scene_id(&self) -> Option<&SceneId> {
        match self {
            Self::Added { id }
            | Self::Updated { id }
            | Self::Deleted { id }
            | Self::Activated { id } => Some(id),
            Self::Reordered { .. } | Self::Cleared => None,
        }
    }

    /// Returns `true` if the library contents changed.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Activated { .. })
    }
}
