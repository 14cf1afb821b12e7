// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The scene store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{RwLock, RwLockWriteGuard};

use super::{
    KeyValueStorage, SavedDeviceState, SavedScene, SceneCategory, SceneCursors, SceneDraft,
    SceneId, ScenePatch, merge_defaults,
};
use crate::config::PanelConfig;
use crate::error::{SceneError, StorageError};
use crate::event::{EventBus, SceneEvent};

struct Inner {
    scenes: Vec<SavedScene>,
    cursors: SceneCursors,
}

/// Durable library of saved scenes.
///
/// The store is constructed once per app session and shared by `Arc` with
/// every screen and with the activation engine. All operations take `&self`.
/// Every mutation rewrites the whole collection to storage under one key.
///
/// Storage failures never reach the caller: a failed load falls back to the
/// default scenes, a failed save is logged and the in-memory library keeps
/// the mutation.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use lampcore::PanelConfig;
/// use lampcore::scene::{MemoryStorage, SavedDeviceState, SceneDraft, SceneStore};
/// use lampcore::types::HsvColour;
///
/// let store = SceneStore::load(Arc::new(MemoryStorage::new()), &PanelConfig::default(), Vec::new());
///
/// let id = store
///     .add(SceneDraft::new(
///         "Evening",
///         vec![SavedDeviceState::colour("D1", "Lamp1", HsvColour::new(300, 800, 500).unwrap())],
///     ))
///     .unwrap();
///
/// assert_eq!(store.count(), 1);
/// assert_eq!(store.all()[0].id, id);
/// ```
pub struct SceneStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    max_scenes: usize,
    inner: RwLock<Inner>,
    events: EventBus,
}

impl SceneStore {
    /// Loads the library from storage.
    ///
    /// Persisted entries take precedence; stock scenes from `defaults` whose
    /// id is not present are appended while under capacity. Loading never
    /// writes back to storage.
    #[must_use]
    pub fn load(
        storage: Arc<dyn KeyValueStorage>,
        config: &PanelConfig,
        defaults: Vec<SavedScene>,
    ) -> Self {
        let persisted = read_blob(storage.as_ref(), &config.storage_key);
        if persisted.len() > config.max_scenes {
            tracing::warn!(
                count = persisted.len(),
                max = config.max_scenes,
                "persisted scene library exceeds capacity"
            );
        }
        let scenes = merge_defaults(persisted, &defaults, config.max_scenes);
        tracing::info!(count = scenes.len(), "scene library loaded");

        Self {
            storage,
            key: config.storage_key.clone(),
            max_scenes: config.max_scenes,
            inner: RwLock::new(Inner {
                scenes,
                cursors: SceneCursors::default(),
            }),
            events: EventBus::new(),
        }
    }

    /// Returns the event bus on which mutations are published.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns the library capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_scenes
    }

    // ========== Mutations ==========

    /// Adds a scene at the head of the library.
    ///
    /// # Errors
    ///
    /// - `SceneError::CapacityExceeded` if the library is full
    /// - `SceneError::EmptyName` if the name is blank
    /// - `SceneError::NoDevices` if the draft has no device
    ///
    /// The library is unchanged on error.
    pub fn add(&self, draft: SceneDraft) -> Result<SceneId, SceneError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(SceneError::EmptyName);
        }
        if draft.devices.is_empty() {
            return Err(SceneError::NoDevices);
        }

        self.mutate(|inner| {
            if inner.scenes.len() >= self.max_scenes {
                tracing::warn!(max = self.max_scenes, "scene limit reached, add ignored");
                return Err(SceneError::CapacityExceeded {
                    max: self.max_scenes,
                });
            }

            let mut id = SceneId::generate();
            while inner.scenes.iter().any(|s| s.id == id) {
                id = SceneId::generate();
            }
            let scene = SceneDraft { name, ..draft }
                .into_scene(id.clone(), Utc::now().timestamp_millis());
            tracing::info!(
                id = %id,
                name = %scene.name,
                devices = scene.devices.len(),
                "scene added"
            );
            inner.scenes.insert(0, scene);
            Ok((id.clone(), SceneEvent::Added { id }))
        })
    }

    /// Merges the present fields of a patch into a scene.
    ///
    /// # Errors
    ///
    /// - `SceneError::NotFound` if no scene has the id
    /// - `SceneError::NoDevices` if the patch empties the device list
    /// - `SceneError::EmptyName` if the patch blanks the name
    pub fn update(&self, id: &SceneId, patch: ScenePatch) -> Result<(), SceneError> {
        self.mutate(|inner| {
            let scene = find_mut(&mut inner.scenes, id)?;
            scene.apply(patch)?;
            tracing::info!(id = %id, "scene updated");
            Ok(((), SceneEvent::Updated { id: id.clone() }))
        })
    }

    /// Removes a scene and clears the cursors pointing at it.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::NotFound` if no scene has the id.
    pub fn delete(&self, id: &SceneId) -> Result<(), SceneError> {
        self.mutate(|inner| {
            let index = position(&inner.scenes, id)?;
            let removed = inner.scenes.remove(index);
            inner.cursors.forget(id);
            tracing::info!(id = %id, name = %removed.name, "scene deleted");
            Ok(((), SceneEvent::Deleted { id: id.clone() }))
        })
    }

    /// Replaces the library with a caller-ordered collection.
    ///
    /// The order is taken as is and persisted unconditionally; a repeated id
    /// keeps only its first occurrence.
    pub fn reorder(&self, scenes: Vec<SavedScene>) {
        let scenes = dedup(scenes);
        let count = scenes.len();
        let mut inner = self.inner.write();
        inner.scenes = scenes;
        tracing::info!(count, "scenes reordered");
        self.commit(inner, SceneEvent::Reordered { count });
    }

    /// Removes every scene and resets the cursors.
    pub fn clear_all(&self) {
        let mut inner = self.inner.write();
        inner.scenes.clear();
        inner.cursors.reset();
        tracing::info!("all scenes cleared");
        self.commit(inner, SceneEvent::Cleared);
    }

    /// Flips the favourite flag of a scene and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::NotFound` if no scene has the id.
    pub fn toggle_favorite(&self, id: &SceneId) -> Result<bool, SceneError> {
        self.mutate(|inner| {
            let scene = find_mut(&mut inner.scenes, id)?;
            scene.is_favorite = !scene.is_favorite;
            tracing::info!(id = %id, favorite = scene.is_favorite, "favourite toggled");
            Ok((scene.is_favorite, SceneEvent::Updated { id: id.clone() }))
        })
    }

    /// Inserts or replaces the entry of one lamp within a scene.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::NotFound` if no scene has the id.
    pub fn upsert_device(&self, id: &SceneId, state: SavedDeviceState) -> Result<(), SceneError> {
        self.mutate(|inner| {
            let scene = find_mut(&mut inner.scenes, id)?;
            match scene
                .devices
                .iter_mut()
                .find(|d| d.device_id == state.device_id)
            {
                Some(existing) => *existing = state,
                None => scene.devices.push(state),
            }
            tracing::info!(id = %id, devices = scene.devices.len(), "scene device stored");
            Ok(((), SceneEvent::Updated { id: id.clone() }))
        })
    }

    /// Removes the entry of one lamp from a scene.
    ///
    /// Returns `false` if the lamp was not part of the scene.
    ///
    /// # Errors
    ///
    /// - `SceneError::NotFound` if no scene has the id
    /// - `SceneError::LastDevice` if the lamp is the only entry
    pub fn remove_device(&self, id: &SceneId, device_id: &str) -> Result<bool, SceneError> {
        {
            let inner = self.inner.read();
            let scene = inner
                .scenes
                .iter()
                .find(|s| &s.id == id)
                .ok_or_else(|| not_found(id))?;
            if scene.device(device_id).is_none() {
                return Ok(false);
            }
        }

        self.mutate(|inner| {
            let scene = find_mut(&mut inner.scenes, id)?;
            let Some(index) = scene.devices.iter().position(|d| d.device_id == device_id) else {
                return Err(SceneError::NotFound(id.clone()));
            };
            if scene.devices.len() == 1 {
                return Err(SceneError::LastDevice);
            }
            scene.devices.remove(index);
            tracing::info!(id = %id, device_id, "scene device removed");
            Ok((true, SceneEvent::Updated { id: id.clone() }))
        })
    }

    // ========== Selectors ==========

    /// Returns every scene, most recent first.
    #[must_use]
    pub fn all(&self) -> Vec<SavedScene> {
        self.inner.read().scenes.clone()
    }

    /// Returns the number of scenes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.read().scenes.len()
    }

    /// Returns `true` while the library is under capacity.
    #[must_use]
    pub fn can_add_more(&self) -> bool {
        self.count() < self.max_scenes
    }

    /// Returns the scene with the id.
    #[must_use]
    pub fn by_id(&self, id: &SceneId) -> Option<SavedScene> {
        self.inner.read().scenes.iter().find(|s| &s.id == id).cloned()
    }

    /// Returns the favourite scenes.
    #[must_use]
    pub fn favorites(&self) -> Vec<SavedScene> {
        self.filtered(|s| s.is_favorite)
    }

    /// Returns the scenes of a library section.
    #[must_use]
    pub fn by_category(&self, category: SceneCategory) -> Vec<SavedScene> {
        self.filtered(|s| s.category == category)
    }

    /// Returns the scenes whose name contains the query, ignoring case.
    ///
    /// An empty query matches every scene.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SavedScene> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.all();
        }
        self.filtered(|s| s.name.to_lowercase().contains(&query))
    }

    fn filtered(&self, keep: impl Fn(&SavedScene) -> bool) -> Vec<SavedScene> {
        self.inner
            .read()
            .scenes
            .iter()
            .filter(|s| keep(s))
            .cloned()
            .collect()
    }

    // ========== Cursors ==========

    /// Highlights a scene as the active one.
    pub fn set_active_scene(&self, id: SceneId) {
        tracing::debug!(id = %id, "active scene set");
        self.inner.write().cursors.active = Some(id);
    }

    /// Returns the highlighted scene.
    #[must_use]
    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.inner.read().cursors.active.clone()
    }

    /// Opens a scene in the editor.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::NotFound` if no scene has the id.
    pub fn begin_editing(&self, id: &SceneId) -> Result<(), SceneError> {
        let mut inner = self.inner.write();
        position(&inner.scenes, id)?;
        inner.cursors.editing = Some(id.clone());
        Ok(())
    }

    /// Closes the editor.
    pub fn end_editing(&self) {
        self.inner.write().cursors.editing = None;
    }

    /// Returns the scene open in the editor.
    #[must_use]
    pub fn editing_scene_id(&self) -> Option<SceneId> {
        self.inner.read().cursors.editing.clone()
    }

    /// Clears both cursors, as on navigating away from the scene screens.
    pub fn reset_cursors(&self) {
        self.inner.write().cursors.reset();
    }

    // ========== Persistence ==========

    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Inner) -> Result<(T, SceneEvent), SceneError>,
    ) -> Result<T, SceneError> {
        let mut inner = self.inner.write();
        let (output, event) = change(&mut inner)?;
        self.commit(inner, event);
        Ok(output)
    }

    fn commit(&self, inner: RwLockWriteGuard<'_, Inner>, event: SceneEvent) {
        self.persist(&inner.scenes);
        drop(inner);
        self.events.publish(event);
    }

    fn persist(&self, scenes: &[SavedScene]) {
        let result = serde_json::to_string(scenes)
            .map_err(StorageError::from)
            .and_then(|blob| self.storage.set(&self.key, &blob));
        match result {
            Ok(()) => tracing::debug!(count = scenes.len(), key = %self.key, "scenes saved"),
            Err(e) => tracing::error!(error = %e, key = %self.key, "failed to save scenes"),
        }
    }
}

impl std::fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStore")
            .field("key", &self.key)
            .field("max_scenes", &self.max_scenes)
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

fn read_blob(storage: &dyn KeyValueStorage, key: &str) -> Vec<SavedScene> {
    let blob = match storage.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            tracing::info!(key, "no saved scenes, starting from defaults");
            return Vec::new();
        }
        Err(e) => {
            tracing::error!(error = %e, key, "failed to read saved scenes, using defaults");
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&blob) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(error = %e, key, "saved scenes are corrupt, using defaults");
            return Vec::new();
        }
    };

    let scenes = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<SavedScene>(entry) {
            Ok(scene) if scene.devices.is_empty() => {
                tracing::warn!(id = %scene.id, "saved scene has no devices, dropped");
                None
            }
            Ok(scene) => Some(scene),
            Err(e) => {
                tracing::warn!(index, error = %e, "invalid saved scene dropped");
                None
            }
        })
        .collect();
    dedup(scenes)
}

fn dedup(scenes: Vec<SavedScene>) -> Vec<SavedScene> {
    let mut seen = HashSet::new();
    scenes
        .into_iter()
        .filter(|s| {
            let fresh = seen.insert(s.id.clone());
            if !fresh {
                tracing::warn!(id = %s.id, "duplicate scene id dropped");
            }
            fresh
        })
        .collect()
}

fn not_found(id: &SceneId) -> SceneError {
    tracing::warn!(id = %id, "scene not found");
    SceneError::NotFound(id.clone())
}

fn position(scenes: &[SavedScene], id: &SceneId) -> Result<usize, SceneError> {
    scenes
        .iter()
        .position(|s| &s.id == id)
        .ok_or_else(|| not_found(id))
}

fn find_mut<'a>(
    scenes: &'a mut [SavedScene],
    id: &SceneId,
) -> Result<&'a mut SavedScene, SceneError> {
    let index = position(scenes, id)?;
    Ok(&mut scenes[index])
}
