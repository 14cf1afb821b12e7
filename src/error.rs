// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `lampcore` library.
//!
//! The hierarchy mirrors the three concerns of the crate: value validation at
//! the input boundary, scene store integrity, persistence, and writes to the
//! device property channel. None of these are fatal to a UI session; callers
//! inspect the returned error to decide whether to show a notice.

use thiserror::Error;

use crate::channel::Property;
use crate::scene::SceneId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A scene store operation was rejected.
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    /// Reading or writing the persisted scene blob failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A device property write could not be dispatched.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A hue value is outside the valid range (0-360).
    #[error("hue value {0} is out of range [0, 360]")]
    InvalidHue(u16),

    /// A gesture produced a NaN or infinite coordinate.
    #[error("gesture value is not a finite number")]
    NotFinite,

    /// A string did not name a known enum variant.
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// The enum being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A control data payload could not be decoded.
    #[error("malformed control data: {0}")]
    MalformedControlData(String),
}

/// Errors returned by scene store operations.
///
/// Every variant leaves the store unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The store already holds the maximum number of scenes.
    #[error("scene limit of {max} reached")]
    CapacityExceeded {
        /// The configured capacity.
        max: usize,
    },

    /// No scene with this id exists.
    #[error("scene {0} not found")]
    NotFound(SceneId),

    /// The device is the last one in the scene and cannot be removed.
    #[error("a scene must keep at least one device")]
    LastDevice,

    /// The scene would have no devices.
    #[error("a scene needs at least one device")]
    NoDevices,

    /// The scene name is blank.
    #[error("scene name is empty")]
    EmptyName,

    /// The scene name exceeds the input limit.
    #[error("scene name is longer than {max} characters")]
    NameTooLong {
        /// Maximum number of characters.
        max: usize,
    },
}

/// Errors related to the persistent key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blob could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The storage backend is not reachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a device property channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The connected device profile does not expose this property.
    #[error("property {0} is not supported by this device")]
    Unsupported(Property),

    /// The transport refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
