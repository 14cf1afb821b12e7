// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `LampCore` - the control core of a smart lamp panel.
//!
//! This library holds the logic behind a lamp control app's screens, with
//! the device transport and the storage left to the host:
//!
//! - **Scene library**: named snapshots of one or more lamps, capped,
//!   persisted as one JSON blob, seeded with per-profile stock scenes
//! - **Reconciliation**: an optimistic per-axis mirror of the lamp that
//!   shows gestures immediately, throttles move-phase writes and ignores
//!   stale hardware echoes
//! - **Activation**: replays a scene onto the lamps with the write ordering
//!   the hardware needs
//!
//! # Supported Profiles
//!
//! - RGBCW: colour and tunable white
//! - RGB: colour only
//! - CW: tunable white only
//!
//! # Quick Start
//!
//! ## Saving and activating a scene
//!
//! ```
//! use std::sync::Arc;
//!
//! use lampcore::activation::{ActivationEngine, ActivationTarget};
//! use lampcore::channel::{MemoryChannel, SingleChannel};
//! use lampcore::scene::{MemoryStorage, SavedDeviceState, SceneDraft, SceneStore, default_scenes};
//! use lampcore::types::HsvColour;
//! use lampcore::{LampCapabilities, PanelConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> lampcore::Result<()> {
//! let config = PanelConfig::default();
//! let channel = Arc::new(MemoryChannel::new());
//! let profile = LampCapabilities::from_channel(channel.as_ref()).profile();
//!
//! let store = Arc::new(SceneStore::load(
//!     Arc::new(MemoryStorage::new()),
//!     &config,
//!     default_scenes(profile),
//! ));
//! store.clear_all();
//!
//! let id = store.add(SceneDraft::new(
//!     "Evening",
//!     vec![SavedDeviceState::colour("D1", "Lamp1", HsvColour::new(300, 800, 500)?)],
//! ))?;
//!
//! let engine = ActivationEngine::new(store.clone(), Arc::new(SingleChannel::new(channel)), &config);
//! engine.activate(&id, &ActivationTarget::device("D1")).await?;
//! assert_eq!(store.active_scene_id(), Some(id));
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving a slider
//!
//! ```
//! use std::sync::Arc;
//!
//! use lampcore::PanelConfig;
//! use lampcore::channel::{MemoryChannel, Property};
//! use lampcore::reconcile::{Axis, GestureInput, ReconcileSession};
//! use lampcore::state::StateChange;
//! use lampcore::types::Level;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> lampcore::Result<()> {
//! let channel = Arc::new(MemoryChannel::new());
//! let session = ReconcileSession::mount(channel.clone(), &PanelConfig::default());
//!
//! session.touch_start(Axis::Brightness);
//! session.touch_move(Axis::Brightness, GestureInput::slider(300.0))?;
//!
//! // a stale report during the gesture is ignored
//! channel.push(&StateChange::Brightness(Level::clamped(900)));
//! assert_eq!(session.state().brightness.value(), 300);
//!
//! session.touch_end(Axis::Brightness, Some(GestureInput::slider(320.0)))?;
//! assert_eq!(channel.writes_to(Property::BrightValue).len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod capabilities;
pub mod channel;
pub mod config;
pub mod error;
pub mod event;
pub mod reconcile;
pub mod scene;
pub mod state;
pub mod types;

pub use capabilities::{LampCapabilities, LampCapabilitiesBuilder, LampProfile};
pub use config::{DispatchMode, PanelConfig};
pub use error::{ChannelError, Error, Result, SceneError, StorageError, ValueError};
pub use scene::{SavedDeviceState, SavedScene, SceneId, SceneStore};
pub use types::{HsvColour, Hue, Level, LightMode, WorkMode};
