// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are what the lamp pushes when one of its properties changes
//! on the hardware side. They are applied to a
//! [`DeviceLightState`](super::DeviceLightState) directly, or filtered first by
//! the reconciler while a gesture owns an axis.
//!
//! # Examples
//!
//! ```
//! use lampcore::state::{DeviceLightState, StateChange};
//! use lampcore::types::Level;
//!
//! let mut state = DeviceLightState::new();
//!
//! let changed = state.apply(&StateChange::Brightness(Level::new(300).unwrap()));
//! assert!(changed);
//!
//! // Applying the same change again returns false
//! let changed = state.apply(&StateChange::Brightness(Level::new(300).unwrap()));
//! assert!(!changed);
//! ```

use crate::types::{HsvColour, Level, WorkMode};

/// A hardware-reported change of one or more lamp properties.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Lamp switched on or off.
    Power(bool),

    /// Work mode changed.
    WorkMode(WorkMode),

    /// White brightness changed.
    Brightness(Level),

    /// White temperature changed.
    Temperature(Level),

    /// Colour changed.
    Colour(HsvColour),

    /// The fixture's selected sub-lamp changed.
    SelectedDevice(String),

    /// A sub-lamp display name changed.
    DeviceName {
        /// The name slot (1-3).
        slot: u8,
        /// The new display name.
        name: String,
    },

    /// Multiple changes at once.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns `true` if this change touches a light output channel.
    #[must_use]
    pub fn is_light(&self) -> bool {
        matches!(
            self,
            Self::Brightness(_) | Self::Temperature(_) | Self::Colour(_)
        )
    }

    /// Returns the number of individual changes.
    ///
    /// For batch changes, returns the total count of nested changes.
    #[must_use]
    pub fn change_count(&self) -> usize {
        match self {
            Self::Batch(changes) => changes.iter().map(Self::change_count).sum(),
            _ => 1,
        }
    }

    /// Flattens nested batches into a list of single changes.
    #[must_use]
    pub fn flatten(&self) -> Vec<&StateChange> {
        match self {
            Self::Batch(changes) => changes.iter().flat_map(Self::flatten).collect(),
            single => vec![single],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_light() {
        assert!(StateChange::Brightness(Level::MAX).is_light());
        assert!(!StateChange::Power(true).is_light());
        assert!(!StateChange::WorkMode(WorkMode::Scene).is_light());
    }

    #[test]
    fn change_count_counts_nested() {
        let batch = StateChange::batch(vec![
            StateChange::Power(true),
            StateChange::Brightness(Level::MAX),
        ]);
        assert_eq!(batch.change_count(), 2);

        let nested = StateChange::batch(vec![batch, StateChange::Power(false)]);
        assert_eq!(nested.change_count(), 3);
    }

    #[test]
    fn flatten_preserves_order() {
        let nested = StateChange::batch(vec![
            StateChange::Power(true),
            StateChange::batch(vec![StateChange::WorkMode(WorkMode::Colour)]),
            StateChange::Temperature(Level::MIN),
        ]);
        let flat = nested.flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0], &StateChange::Power(true));
        assert_eq!(flat[1], &StateChange::WorkMode(WorkMode::Colour));
        assert_eq!(flat[2], &StateChange::Temperature(Level::MIN));
    }
}
