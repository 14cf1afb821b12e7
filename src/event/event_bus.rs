// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of scene events to open screens.

use tokio::sync::broadcast;

use super::SceneEvent;

/// Events a screen may fall behind before it starts losing the oldest ones.
const SCENE_EVENT_BACKLOG: usize = 64;

/// Broadcasts scene library changes to every open screen.
///
/// Screens keep a receiver and re-read the [`SceneStore`] when an event
/// arrives. A receiver more than the backlog behind gets
/// `RecvError::Lagged`; a full re-read recovers from that.
///
/// [`SceneStore`]: crate::scene::SceneStore
///
/// # Examples
///
/// ```
/// use lampcore::event::{EventBus, SceneEvent};
///
/// let bus = EventBus::new();
/// let mut screen = bus.subscribe();
///
/// assert_eq!(bus.publish(SceneEvent::Cleared), 1);
/// assert_eq!(screen.try_recv().unwrap(), SceneEvent::Cleared);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SceneEvent>,
}

impl EventBus {
    /// Creates a bus with the default backlog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backlog(SCENE_EVENT_BACKLOG)
    }

    /// Creates a bus buffering up to `backlog` events per screen.
    ///
    /// A zero backlog is raised to one.
    #[must_use]
    pub fn with_backlog(backlog: usize) -> Self {
        let (tx, _) = broadcast::channel(backlog.max(1));
        Self { tx }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SceneEvent> {
        self.tx.subscribe()
    }

    /// Number of screens listening.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Sends an event to every listening screen and returns how many got it.
    ///
    /// With nobody listening the event is dropped and `0` is returned.
    pub fn publish(&self, event: SceneEvent) -> usize {
        tracing::trace!(event = ?event, "scene event");
        self.tx.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneId;

    #[test]
    fn receivers_are_counted() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let _second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(first);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn every_screen_sees_each_event() {
        let bus = EventBus::new();
        let mut list = bus.subscribe();
        let mut detail = bus.subscribe();
        let id = SceneId::from("scene_1_abcdefghi");

        assert_eq!(bus.publish(SceneEvent::Deleted { id: id.clone() }), 2);

        assert_eq!(list.recv().await.unwrap().scene_id(), Some(&id));
        assert_eq!(detail.recv().await.unwrap().scene_id(), Some(&id));
    }

    #[test]
    fn nobody_listening() {
        assert_eq!(EventBus::default().publish(SceneEvent::Cleared), 0);
    }

    #[test]
    fn clones_publish_to_the_same_receivers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.clone().publish(SceneEvent::Reordered { count: 3 });
        assert_eq!(rx.try_recv().unwrap(), SceneEvent::Reordered { count: 3 });
    }

    #[test]
    fn zero_backlog_still_delivers() {
        let bus = EventBus::with_backlog(0);
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(SceneEvent::Cleared), 1);
        assert_eq!(rx.try_recv().unwrap(), SceneEvent::Cleared);
    }

    #[test]
    fn slow_screen_lags() {
        let bus = EventBus::with_backlog(2);
        let mut rx = bus.subscribe();
        for count in 0..4 {
            bus.publish(SceneEvent::Reordered { count });
        }
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(_))
        ));
    }
}
