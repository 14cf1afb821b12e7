// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device property channel.
//!
//! The lamp is reached through a [`PropertyChannel`]: a property read/write
//! transport with hardware-push subscriptions and a capability query. The
//! library never owns a transport itself; the host app provides one, and
//! [`MemoryChannel`] stands in for it in tests and demos.
//!
//! # Writes
//!
//! A [`WriteRequest`] carries one or more `(Property, PropertyValue)` pairs
//! written together, plus [`WriteOptions`] describing delivery priority:
//!
//! - `throttle` - coalescing window hint for the transport
//! - `immediate` - bypass any coalescing
//! - `delay` - deliberate post-dispatch delay
//! - `check_repeat` - suppress a write identical to the current value
//!
//! # Examples
//!
//! ```
//! use lampcore::channel::{MemoryChannel, Property, PropertyChannel, PropertyValue, WriteRequest};
//!
//! let channel = MemoryChannel::new();
//! channel
//!     .write(WriteRequest::single(Property::SwitchLed, PropertyValue::Bool(true)))
//!     .unwrap();
//!
//! assert_eq!(channel.read(Property::SwitchLed), Some(PropertyValue::Bool(true)));
//! ```

mod directory;
mod memory;
mod property;
mod subscription;

use std::time::Duration;

pub use directory::{ChannelDirectory, SingleChannel};
pub use memory::{MemoryChannel, RecordedWrite};
pub use property::{ControlData, Property, PropertyValue};
pub use subscription::{PushCallback, PushRegistry, SubscriptionId};

use crate::error::ChannelError;
use crate::state::{DeviceLightState, StateChange};

/// Delivery options of a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Coalescing window the transport may apply.
    pub throttle: Option<Duration>,
    /// Bypass any coalescing and send now.
    pub immediate: bool,
    /// Post-dispatch delay before the next command may follow.
    pub delay: Option<Duration>,
    /// Skip the write if it repeats the current value.
    pub check_repeat: bool,
}

impl WriteOptions {
    /// Options for a high-priority write bypassing coalescing.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            immediate: true,
            ..Self::default()
        }
    }

    /// Options for a coalesced move-phase write.
    #[must_use]
    pub fn throttled(window: Duration) -> Self {
        Self {
            throttle: Some(window),
            ..Self::default()
        }
    }

    /// Sets the post-dispatch delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Enables redundant-write suppression.
    #[must_use]
    pub fn with_check_repeat(mut self) -> Self {
        self.check_repeat = true;
        self
    }
}

/// An ordered single- or multi-property write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// Properties written together, in dispatch order.
    pub entries: Vec<(Property, PropertyValue)>,
    /// Delivery options.
    pub options: WriteOptions,
}

impl WriteRequest {
    /// Creates a write of a single property.
    #[must_use]
    pub fn single(property: Property, value: PropertyValue) -> Self {
        Self::multi(vec![(property, value)])
    }

    /// Creates a combined write of several properties.
    #[must_use]
    pub fn multi(entries: Vec<(Property, PropertyValue)>) -> Self {
        Self {
            entries,
            options: WriteOptions::default(),
        }
    }

    /// Sets the delivery options.
    #[must_use]
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns `true` if the request writes the property.
    #[must_use]
    pub fn writes(&self, property: Property) -> bool {
        self.entries.iter().any(|(p, _)| *p == property)
    }

    /// Returns the value written to the property, if any.
    #[must_use]
    pub fn value_of(&self, property: Property) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v)
    }

    /// Returns the written properties in order.
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }
}

/// Transport to one lamp (or one group of lamps addressed as a whole).
///
/// Writes are fire-and-forget: `write` returns once the request was handed
/// to the transport, without waiting for the lamp to acknowledge it.
/// Pushes arrive through subscribed callbacks, possibly from another task.
pub trait PropertyChannel: Send + Sync {
    /// Returns the last hardware-reported value of a property.
    fn read(&self, property: Property) -> Option<PropertyValue>;

    /// Dispatches a write.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Unsupported` if any property of the request is
    /// not exposed by the lamp, and `ChannelError::Rejected` if the transport
    /// refused the request.
    fn write(&self, request: WriteRequest) -> Result<(), ChannelError>;

    /// Registers a hardware-push callback.
    fn subscribe(&self, callback: PushCallback) -> SubscriptionId;

    /// Removes a hardware-push callback. Returns `true` if it was registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Returns `true` if the lamp exposes the property.
    fn is_supported(&self, property: Property) -> bool;

    /// Returns `true` for grouped or virtual devices.
    fn is_group(&self) -> bool {
        false
    }

    /// Builds the hardware-reported light state from individual reads.
    ///
    /// Properties that cannot be read keep their default value.
    fn read_state(&self) -> DeviceLightState {
        let mut state = DeviceLightState::new();
        if let Some(on) = self.read(Property::SwitchLed).and_then(|v| v.as_bool()) {
            state.power = on;
        }
        if let Some(mode) = self
            .read(Property::WorkMode)
            .and_then(|v| v.as_work_mode())
            .and_then(|m| m.light_mode())
        {
            state.mode = mode;
        }
        if let Some(level) = self.read(Property::BrightValue).and_then(|v| v.as_level()) {
            state.brightness = level;
        }
        if let Some(level) = self.read(Property::TempValue).and_then(|v| v.as_level()) {
            state.temperature = level;
        }
        if let Some(colour) = self.read(Property::ColourData).and_then(|v| v.as_colour()) {
            state.colour = colour;
        }
        state
    }
}

/// Translates a written property value into the push the lamp reports for it.
///
/// Preview and playback payloads are not reported back and yield `None`.
#[must_use]
pub fn reported_change(property: Property, value: &PropertyValue) -> Option<StateChange> {
    match (property, value) {
        (Property::SwitchLed, PropertyValue::Bool(on)) => Some(StateChange::Power(*on)),
        (Property::WorkMode, PropertyValue::WorkMode(mode)) => Some(StateChange::WorkMode(*mode)),
        (Property::BrightValue, PropertyValue::Level(level)) => {
            Some(StateChange::Brightness(*level))
        }
        (Property::TempValue, PropertyValue::Level(level)) => {
            Some(StateChange::Temperature(*level))
        }
        (Property::ColourData, PropertyValue::Colour(colour)) => Some(StateChange::Colour(*colour)),
        (Property::SelectedDevice, PropertyValue::Text(id)) => {
            Some(StateChange::SelectedDevice(id.clone()))
        }
        (Property::DeviceName(slot), PropertyValue::Text(name)) => Some(StateChange::DeviceName {
            slot,
            name: name.clone(),
        }),
        _ => None,
    }
}
