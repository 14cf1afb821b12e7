// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default scene library capacity.
pub const DEFAULT_MAX_SCENES: usize = 6;

/// Default storage key of the scene blob.
pub const DEFAULT_STORAGE_KEY: &str = "saved_custom_scenes";

/// Whether hardware writes are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Writes reach the channel.
    #[default]
    Live,
    /// Writes are logged and dropped; local state still follows the user.
    LocalOnly,
}

/// Tunables of a panel session.
///
/// Durations serialize as integer milliseconds; missing fields take their
/// defaults.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lampcore::PanelConfig;
///
/// let config = PanelConfig::default()
///     .with_max_scenes(12)
///     .with_throttle_interval(Duration::from_millis(16));
/// assert_eq!(config.max_scenes, 12);
///
/// let parsed: PanelConfig = serde_json::from_str(r#"{"ordering_delay": 600}"#).unwrap();
/// assert_eq!(parsed.ordering_delay, Duration::from_millis(600));
/// assert_eq!(parsed.max_scenes, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Scene library capacity.
    pub max_scenes: usize,
    /// Storage key of the scene blob.
    pub storage_key: String,
    /// Minimum interval between move-phase writes of one axis.
    #[serde(with = "millis")]
    pub throttle_interval: Duration,
    /// Window after a commit in which hardware echoes are suppressed.
    #[serde(with = "millis")]
    pub echo_guard: Duration,
    /// Delay between the work-mode write and the payload write for grouped
    /// or multi-device targets.
    #[serde(with = "millis")]
    pub ordering_delay: Duration,
    /// Whether hardware writes are dispatched.
    pub dispatch: DispatchMode,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            max_scenes: DEFAULT_MAX_SCENES,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            throttle_interval: Duration::from_millis(200),
            echo_guard: Duration::from_millis(1000),
            ordering_delay: Duration::from_millis(300),
            dispatch: DispatchMode::Live,
        }
    }
}

impl PanelConfig {
    /// Sets the scene library capacity.
    #[must_use]
    pub fn with_max_scenes(mut self, max_scenes: usize) -> Self {
        self.max_scenes = max_scenes;
        self
    }

    /// Sets the storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the move-phase throttle interval.
    #[must_use]
    pub fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    /// Sets the echo guard window.
    #[must_use]
    pub fn with_echo_guard(mut self, guard: Duration) -> Self {
        self.echo_guard = guard;
        self
    }

    /// Sets the activation ordering delay.
    #[must_use]
    pub fn with_ordering_delay(mut self, delay: Duration) -> Self {
        self.ordering_delay = delay;
        self
    }

    /// Sets the dispatch mode.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Returns `true` if hardware writes are dispatched.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.dispatch == DispatchMode::Live
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
