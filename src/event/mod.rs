// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for scene library changes.
//!
//! The scene store publishes a [`SceneEvent`] after every successful mutation,
//! and the activation engine after every activation. The [`EventBus`] uses
//! tokio's broadcast channel so several screens receive the same events.
//!
//! # Examples
//!
//! ```
//! use lampcore::event::{EventBus, SceneEvent};
//! use lampcore::scene::SceneId;
//!
//! let bus = EventBus::new();
//!
//! // Subscribe to events
//! let mut rx = bus.subscribe();
//!
//! // Publish an event
//! bus.publish(SceneEvent::Deleted { id: SceneId::from("scene_1_abcdefghi") });
//! assert!(rx.try_recv().is_ok());
//! ```

mod event_bus;
mod scene_event;

pub use event_bus::EventBus;
pub use scene_event::SceneEvent;
