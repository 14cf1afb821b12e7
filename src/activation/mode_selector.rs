// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared work mode indicator.

use std::sync::Arc;

use tokio::sync::watch;

use crate::types::WorkMode;

/// The lamp mode shown by every screen's mode selector.
///
/// Activating a scene pushes the scene's mode here so selectors follow it
/// without polling. Clones share the same indicator.
///
/// # Examples
///
/// ```
/// use lampcore::activation::ModeSelector;
/// use lampcore::types::WorkMode;
///
/// let selector = ModeSelector::new(WorkMode::White);
/// let rx = selector.subscribe();
///
/// assert!(selector.set(WorkMode::Music));
/// assert_eq!(*rx.borrow(), WorkMode::Music);
/// ```
#[derive(Debug, Clone)]
pub struct ModeSelector {
    tx: Arc<watch::Sender<WorkMode>>,
}

impl ModeSelector {
    /// Creates a selector showing `initial`.
    #[must_use]
    pub fn new(initial: WorkMode) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Returns the mode currently shown.
    #[must_use]
    pub fn current(&self) -> WorkMode {
        *self.tx.borrow()
    }

    /// Returns a receiver notified on every mode change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WorkMode> {
        self.tx.subscribe()
    }

    /// Shows `mode`. Returns `true` if it differs from the current mode.
    pub fn set(&self, mode: WorkMode) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        })
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new(WorkMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_mode_does_not_notify() {
        let selector = ModeSelector::default();
        let rx = selector.subscribe();
        assert!(!selector.set(WorkMode::White));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn receivers_see_changes() {
        let selector = ModeSelector::default();
        let mut rx = selector.subscribe();
        selector.set(WorkMode::Colour);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), WorkMode::Colour);
        assert_eq!(selector.current(), WorkMode::Colour);
    }
}
