// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The scene library.
//!
//! A scene is a named snapshot of one or more lamps. The [`SceneStore`] owns
//! the library for an app session: it enforces the capacity, generates ids,
//! persists the whole collection as one JSON blob through a
//! [`KeyValueStorage`], and holds the UI cursors (active and edited scene).
//!
//! # Load merge rule
//!
//! On load, persisted scenes come first and win. Stock scenes (ids starting
//! with [`PRESET_PREFIX`]) that are missing are appended while the library is
//! under capacity, so a first run shows the presets and a user who deletes
//! one sees it again on the next load only if there is room.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use lampcore::capabilities::LampProfile;
//! use lampcore::scene::{MemoryStorage, SceneStore, default_scenes};
//! use lampcore::PanelConfig;
//!
//! let store = SceneStore::load(
//!     Arc::new(MemoryStorage::new()),
//!     &PanelConfig::default(),
//!     default_scenes(LampProfile::Cw),
//! );
//! assert_eq!(store.count(), 3);
//! assert!(store.can_add_more());
//! ```

mod cursor;
mod defaults;
mod id;
mod model;
mod storage;
mod store;

pub use cursor::SceneCursors;
pub use defaults::{FIXTURE_DEVICES, default_scenes, merge_defaults};
pub use id::{PRESET_PREFIX, SceneId};
pub use model::{
    DEFAULT_IMAGE, MAX_NAME_CHARS, SavedDeviceState, SavedScene, SceneCategory, SceneDraft,
    ScenePatch, validate_name,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::SceneStore;
