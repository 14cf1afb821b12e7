// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UI cursors into the scene library.

use super::SceneId;

/// Ephemeral pointers at the highlighted and the edited scene.
///
/// Cursors are never persisted. Deleting a scene clears the cursors that
/// point at it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneCursors {
    /// Scene last activated (UI highlight).
    pub active: Option<SceneId>,
    /// Scene open in the editor.
    pub editing: Option<SceneId>,
}

impl SceneCursors {
    /// Clears every cursor pointing at the scene.
    pub fn forget(&mut self, id: &SceneId) {
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }
    }

    /// Clears both cursors.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
