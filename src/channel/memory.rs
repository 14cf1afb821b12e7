// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory property channel.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;

use super::{
    Property, PropertyChannel, PropertyValue, PushCallback, PushRegistry, SubscriptionId,
    WriteRequest, reported_change,
};
use crate::error::{ChannelError, ValueError};
use crate::state::StateChange;

/// A write accepted by a [`MemoryChannel`], with its dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// When the write was dispatched.
    pub at: Instant,
    /// The dispatched request.
    pub request: WriteRequest,
}

/// Property channel backed by memory.
///
/// Records every accepted write with its dispatch time, holds the current
/// property values, and lets tests inject hardware pushes. With echo enabled
/// every accepted write is reported back to subscribers as the lamp would.
///
/// # Examples
///
/// ```
/// use lampcore::channel::{MemoryChannel, Property, PropertyChannel};
///
/// let channel = MemoryChannel::new().without(Property::ControlData).grouped();
/// assert!(!channel.is_supported(Property::ControlData));
/// assert!(channel.is_group());
/// ```
pub struct MemoryChannel {
    values: RwLock<HashMap<Property, PropertyValue>>,
    supported: RwLock<HashSet<Property>>,
    group: AtomicBool,
    echo: AtomicBool,
    writes: Mutex<Vec<RecordedWrite>>,
    pushes: PushRegistry,
}

impl MemoryChannel {
    /// Creates a channel exposing every property.
    #[must_use]
    pub fn new() -> Self {
        Self::with_properties(all_properties())
    }

    /// Creates a channel exposing only the given properties.
    #[must_use]
    pub fn with_properties(properties: impl IntoIterator<Item = Property>) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            supported: RwLock::new(properties.into_iter().collect()),
            group: AtomicBool::new(false),
            echo: AtomicBool::new(false),
            writes: Mutex::new(Vec::new()),
            pushes: PushRegistry::new(),
        }
    }

    /// Removes a property from the supported set.
    #[must_use]
    pub fn without(self, property: Property) -> Self {
        self.supported.write().remove(&property);
        self
    }

    /// Marks the channel as a grouped device.
    #[must_use]
    pub fn grouped(self) -> Self {
        self.group.store(true, Ordering::Relaxed);
        self
    }

    /// Reports every accepted write back to subscribers.
    #[must_use]
    pub fn echoing(self) -> Self {
        self.echo.store(true, Ordering::Relaxed);
        self
    }

    /// Sets an initial property value.
    #[must_use]
    pub fn with_value(self, property: Property, value: PropertyValue) -> Self {
        self.set_value(property, value);
        self
    }

    /// Sets a property value without notifying subscribers.
    pub fn set_value(&self, property: Property, value: PropertyValue) {
        self.values.write().insert(property, value);
    }

    /// Returns every accepted write in dispatch order.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().clone()
    }

    /// Returns and forgets the accepted writes.
    pub fn take_writes(&self) -> Vec<RecordedWrite> {
        std::mem::take(&mut *self.writes.lock())
    }

    /// Returns the accepted writes touching a property.
    #[must_use]
    pub fn writes_to(&self, property: Property) -> Vec<RecordedWrite> {
        self.writes
            .lock()
            .iter()
            .filter(|w| w.request.writes(property))
            .cloned()
            .collect()
    }

    /// Returns the number of registered push subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.pushes.len()
    }

    /// Simulates a hardware push.
    ///
    /// Updates the stored values, then notifies every subscriber.
    pub fn push(&self, change: &StateChange) {
        {
            let mut values = self.values.write();
            for single in change.flatten() {
                if let Some((property, value)) = reported_value(single) {
                    values.insert(property, value);
                }
            }
        }
        self.pushes.dispatch(change);
    }

    /// Simulates a hardware report arriving as wire text.
    ///
    /// The text is decoded with [`PropertyValue::decode`] and stored;
    /// subscribers are notified for properties that report a state change.
    ///
    /// # Errors
    ///
    /// Returns the decode error; nothing is stored or pushed.
    pub fn push_raw(&self, property: Property, raw: &str) -> Result<(), ValueError> {
        let value = PropertyValue::decode(property, raw)?;
        let change = reported_change(property, &value);
        self.values.write().insert(property, value);
        if let Some(change) = change {
            self.pushes.dispatch(&change);
        }
        Ok(())
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryChannel")
            .field("group", &self.group.load(Ordering::Relaxed))
            .field("writes", &self.writes.lock().len())
            .field("pushes", &self.pushes)
            .finish_non_exhaustive()
    }
}

impl PropertyChannel for MemoryChannel {
    fn read(&self, property: Property) -> Option<PropertyValue> {
        self.values.read().get(&property).cloned()
    }

    fn write(&self, request: WriteRequest) -> Result<(), ChannelError> {
        if let Some(missing) = request.properties().find(|p| !self.is_supported(*p)) {
            return Err(ChannelError::Unsupported(missing));
        }

        if request.options.check_repeat {
            let values = self.values.read();
            let repeated = request
                .entries
                .iter()
                .all(|(p, v)| values.get(p) == Some(v));
            if repeated {
                tracing::debug!(properties = request.entries.len(), "repeated write suppressed");
                return Ok(());
            }
        }

        {
            let mut values = self.values.write();
            for (property, value) in &request.entries {
                values.insert(*property, value.clone());
            }
        }

        let echo: Vec<StateChange> = if self.echo.load(Ordering::Relaxed) {
            request
                .entries
                .iter()
                .filter_map(|(p, v)| reported_change(*p, v))
                .collect()
        } else {
            Vec::new()
        };

        self.writes.lock().push(RecordedWrite {
            at: Instant::now(),
            request,
        });

        match echo.len() {
            0 => {}
            1 => self.pushes.dispatch(&echo[0]),
            _ => self.pushes.dispatch(&StateChange::batch(echo)),
        }
        Ok(())
    }

    fn subscribe(&self, callback: PushCallback) -> SubscriptionId {
        self.pushes.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.pushes.unsubscribe(id)
    }

    fn is_supported(&self, property: Property) -> bool {
        self.supported.read().contains(&property)
    }

    fn is_group(&self) -> bool {
        self.group.load(Ordering::Relaxed)
    }
}

fn all_properties() -> Vec<Property> {
    let mut properties = vec![
        Property::SwitchLed,
        Property::WorkMode,
        Property::BrightValue,
        Property::TempValue,
        Property::ColourData,
        Property::ControlData,
        Property::SceneData,
        Property::MusicData,
        Property::SelectedDevice,
    ];
    properties.extend((1..=Property::NAME_SLOTS).map(Property::DeviceName));
    properties
}

fn reported_value(change: &StateChange) -> Option<(Property, PropertyValue)> {
    Some(match change {
        StateChange::Power(on) => (Property::SwitchLed, PropertyValue::Bool(*on)),
        StateChange::WorkMode(mode) => (Property::WorkMode, PropertyValue::WorkMode(*mode)),
        StateChange::Brightness(level) => (Property::BrightValue, PropertyValue::Level(*level)),
        StateChange::Temperature(level) => (Property::TempValue, PropertyValue::Level(*level)),
        StateChange::Colour(colour) => (Property::ColourData, PropertyValue::Colour(*colour)),
        StateChange::SelectedDevice(id) => {
            (Property::SelectedDevice, PropertyValue::Text(id.clone()))
        }
        StateChange::DeviceName { slot, name } => {
            (Property::DeviceName(*slot), PropertyValue::Text(name.clone()))
        }
        StateChange::Batch(_) => return None,
    })
}
