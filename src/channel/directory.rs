// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing device ids to channels.

use std::collections::HashMap;
use std::sync::Arc;

use super::PropertyChannel;

/// Resolves the device id stored in a scene to the channel reaching it.
pub trait ChannelDirectory: Send + Sync {
    /// Returns the channel for the device, if it is reachable.
    fn channel(&self, device_id: &str) -> Option<Arc<dyn PropertyChannel>>;
}

/// Routes every device id to one channel.
///
/// This is the usual setup of a panel bound to a single fixture: the
/// sub-lamps of a multi-lamp fixture share the fixture's channel.
#[derive(Clone)]
pub struct SingleChannel(Arc<dyn PropertyChannel>);

impl SingleChannel {
    /// Wraps a channel.
    #[must_use]
    pub fn new(channel: Arc<dyn PropertyChannel>) -> Self {
        Self(channel)
    }
}

impl std::fmt::Debug for SingleChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SingleChannel").finish_non_exhaustive()
    }
}

impl ChannelDirectory for SingleChannel {
    fn channel(&self, _device_id: &str) -> Option<Arc<dyn PropertyChannel>> {
        Some(self.0.clone())
    }
}

impl ChannelDirectory for HashMap<String, Arc<dyn PropertyChannel>> {
    fn channel(&self, device_id: &str) -> Option<Arc<dyn PropertyChannel>> {
        self.get(device_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;

    #[test]
    fn single_channel_routes_everything() {
        let directory = SingleChannel::new(Arc::new(MemoryChannel::new()));
        assert!(directory.channel("Device1").is_some());
        assert!(directory.channel("anything").is_some());
    }

    #[test]
    fn map_routes_by_id() {
        let mut directory: HashMap<String, Arc<dyn PropertyChannel>> = HashMap::new();
        directory.insert("D1".to_string(), Arc::new(MemoryChannel::new()));

        assert!(directory.channel("D1").is_some());
        assert!(directory.channel("D2").is_none());
    }
}
