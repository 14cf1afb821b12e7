// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the scene library and its persistence.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lampcore::capabilities::LampProfile;
use lampcore::error::{SceneError, StorageError};
use lampcore::scene::{
    FileStorage, KeyValueStorage, MemoryStorage, SavedDeviceState, SceneDraft, SceneId,
    ScenePatch, SceneStore, default_scenes,
};
use lampcore::types::{HsvColour, Level};
use lampcore::PanelConfig;

fn lamp(id: &str) -> SavedDeviceState {
    SavedDeviceState::white(id, format!("Lamp {id}"), Level::clamped(600), Level::clamped(400))
}

fn draft(name: &str) -> SceneDraft {
    SceneDraft::new(name, vec![lamp("D1")])
}

fn empty_store(storage: Arc<dyn KeyValueStorage>) -> SceneStore {
    SceneStore::load(storage, &PanelConfig::default(), Vec::new())
}

/// Storage that fails every call and counts the attempts.
#[derive(Default)]
struct BrokenStorage {
    calls: AtomicUsize,
}

impl KeyValueStorage for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable("disk gone".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable("disk gone".to_string()))
    }
}

// ============================================================================
// Capacity and Identity
// ============================================================================

mod capacity {
    use super::*;

    #[test]
    fn count_never_exceeds_capacity() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        for i in 0..10 {
            let result = store.add(draft(&format!("Scene {i}")));
            assert!(store.count() <= store.capacity());
            if i >= 6 {
                assert_eq!(result, Err(SceneError::CapacityExceeded { max: 6 }));
            }
        }
        assert_eq!(store.count(), 6);
    }

    #[test]
    fn full_store_is_unchanged_by_add() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        for i in 0..6 {
            store.add(draft(&format!("Scene {i}"))).unwrap();
        }
        let before = store.all();
        assert!(!store.can_add_more());

        assert!(store.add(draft("One more")).is_err());

        assert_eq!(store.all(), before);
        assert!(!store.can_add_more());
    }

    #[test]
    fn configured_capacity_applies() {
        let config = PanelConfig::default().with_max_scenes(2);
        let store = SceneStore::load(Arc::new(MemoryStorage::new()), &config, Vec::new());
        store.add(draft("A")).unwrap();
        store.add(draft("B")).unwrap();
        assert_eq!(
            store.add(draft("C")),
            Err(SceneError::CapacityExceeded { max: 2 })
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        let ids: Vec<SceneId> = (0..6)
            .map(|i| store.add(draft(&format!("S{i}"))).unwrap())
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn newest_scene_comes_first() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        let a = store.add(draft("A")).unwrap();
        let b = store.add(draft("B")).unwrap();

        let all = store.all();
        assert_eq!(all[0].id, b);
        assert_eq!(all[1].id, a);
    }
}

// ============================================================================
// Mutations
// ============================================================================

mod mutations {
    use super::*;

    #[test]
    fn rename_keeps_other_fields() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        let id = store
            .add(draft("Before").favorite().with_image("/img/x.png"))
            .unwrap();
        let before = store.by_id(&id).unwrap();

        store.update(&id, ScenePatch::new().name("After")).unwrap();

        let after = store.by_id(&id).unwrap();
        assert_eq!(after.name, "After");
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.devices, before.devices);
        assert_eq!(after.is_favorite, before.is_favorite);
        assert_eq!(after.custom_image, before.custom_image);
        assert_eq!(after.category, before.category);
        assert_eq!(after.is_multi_device, before.is_multi_device);
    }

    #[test]
    fn delete_then_lookup() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        let keep = store.add(draft("Keep")).unwrap();
        let gone = store.add(draft("Gone")).unwrap();

        store.delete(&gone).unwrap();

        assert!(store.by_id(&gone).is_none());
        assert!(store.by_id(&keep).is_some());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn unknown_ids_change_nothing() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        store.add(draft("Only")).unwrap();
        let before = store.all();
        let missing = SceneId::from("scene_0_missing00");

        assert_eq!(
            store.update(&missing, ScenePatch::new().name("x")),
            Err(SceneError::NotFound(missing.clone()))
        );
        assert!(store.delete(&missing).is_err());
        assert_eq!(store.all(), before);
    }

    #[test]
    fn last_device_cannot_be_removed() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        let id = store
            .add(SceneDraft::new("Pair", vec![lamp("D1"), lamp("D2")]))
            .unwrap();

        assert_eq!(store.remove_device(&id, "D2"), Ok(true));
        assert_eq!(store.remove_device(&id, "D9"), Ok(false));
        assert_eq!(store.remove_device(&id, "D1"), Err(SceneError::LastDevice));
        assert_eq!(store.by_id(&id).unwrap().devices.len(), 1);
    }

    #[test]
    fn upsert_replaces_matching_entry() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        let id = store.add(draft("Scene")).unwrap();
        let colour = HsvColour::new(42, 500, 500).unwrap();

        store
            .upsert_device(&id, SavedDeviceState::colour("D1", "Lamp D1", colour))
            .unwrap();
        store.upsert_device(&id, lamp("D2")).unwrap();

        let scene = store.by_id(&id).unwrap();
        assert_eq!(scene.devices.len(), 2);
        assert_eq!(scene.device("D1").unwrap().colour_payload(), Some(colour));
    }

    #[test]
    fn search_is_case_insensitive() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        store.add(draft("Evening Glow")).unwrap();
        store.add(draft("Morning")).unwrap();

        let hits = store.search("  eVeN ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Evening Glow");
        assert_eq!(store.search("").len(), 2);
    }

    #[test]
    fn deleting_active_scene_clears_cursor() {
        let store = empty_store(Arc::new(MemoryStorage::new()));
        let id = store.add(draft("Active")).unwrap();
        store.set_active_scene(id.clone());
        store.begin_editing(&id).unwrap();

        store.delete(&id).unwrap();

        assert_eq!(store.active_scene_id(), None);
        assert_eq!(store.editing_scene_id(), None);
    }
}

// ============================================================================
// Persistence
// ============================================================================

mod persistence {
    use super::*;

    #[test]
    fn reload_yields_same_collection() {
        let storage = Arc::new(MemoryStorage::new());
        let store = empty_store(storage.clone());
        store.add(draft("A")).unwrap();
        store
            .add(SceneDraft::new("B", vec![lamp("D1"), lamp("D2")]).multi_device())
            .unwrap();
        let id = store.add(draft("C")).unwrap();
        store.toggle_favorite(&id).unwrap();

        let reloaded = empty_store(storage);
        assert_eq!(reloaded.all(), store.all());
    }

    #[test]
    fn file_storage_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let first = empty_store(Arc::new(FileStorage::new(dir.path())));
        let id = first.add(draft("On disk")).unwrap();

        let second = empty_store(Arc::new(FileStorage::new(dir.path())));
        assert_eq!(second.by_id(&id).unwrap().name, "On disk");
        assert!(dir.path().join("saved_custom_scenes.json").exists());
    }

    #[test]
    fn failing_storage_keeps_memory_state() {
        let storage = Arc::new(BrokenStorage::default());
        let store = SceneStore::load(
            storage.clone(),
            &PanelConfig::default(),
            default_scenes(LampProfile::Cw),
        );
        assert_eq!(store.count(), 3);

        let id = store.add(draft("Unsaved")).unwrap();
        assert!(store.by_id(&id).is_some());
        assert_eq!(storage.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::with_entry("saved_custom_scenes", "{not json"));
        let store = SceneStore::load(
            storage.clone(),
            &PanelConfig::default(),
            default_scenes(LampProfile::Rgb),
        );
        assert_eq!(store.count(), 4);
        assert_eq!(
            storage.get("saved_custom_scenes").unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn persisted_scenes_precede_presets() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SceneStore::load(
            storage.clone(),
            &PanelConfig::default(),
            default_scenes(LampProfile::Cw),
        );
        let id = store.add(draft("Mine")).unwrap();

        let reloaded = SceneStore::load(
            storage,
            &PanelConfig::default(),
            default_scenes(LampProfile::Cw),
        );
        let all = reloaded.all();
        assert_eq!(all[0].id, id);
        assert_eq!(all.len(), 4);
        assert!(all[1..].iter().all(|s| s.id.is_preset()));
    }

    #[test]
    fn deleted_preset_returns_only_when_room() {
        let storage = Arc::new(MemoryStorage::new());
        let config = PanelConfig::default().with_max_scenes(3);
        let store = SceneStore::load(storage.clone(), &config, default_scenes(LampProfile::Cw));
        let preset = store.all()[0].id.clone();
        store.delete(&preset).unwrap();
        store.add(draft("Mine")).unwrap();

        let reloaded = SceneStore::load(storage, &config, default_scenes(LampProfile::Cw));
        assert_eq!(reloaded.count(), 3);
        assert!(reloaded.by_id(&preset).is_none());
    }
}
