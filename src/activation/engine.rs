// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene activation engine.

use std::sync::Arc;
use std::time::Duration;

use super::{ActivationReport, ActivationStep, DeviceReport, ModeSelector, SkipReason};
use crate::channel::{
    ChannelDirectory, Property, PropertyChannel, PropertyValue, WriteOptions, WriteRequest,
};
use crate::config::{DispatchMode, PanelConfig};
use crate::error::{ChannelError, Result, SceneError};
use crate::event::SceneEvent;
use crate::scene::{SavedDeviceState, SavedScene, SceneId, SceneStore};
use crate::types::{LightMode, WorkMode};

/// Which lamp a single-device scene is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationTarget {
    /// The lamp currently selected in the UI.
    pub selected_device: Option<String>,
}

impl ActivationTarget {
    /// Targets the given lamp.
    #[must_use]
    pub fn device(device_id: impl Into<String>) -> Self {
        Self {
            selected_device: Some(device_id.into()),
        }
    }
}

/// Reproduces saved scenes on the lamps.
///
/// Each targeted lamp gets its writes strictly in order: power on when off,
/// then the work mode, then the mode payload. On a group channel or in a
/// multi-device scene the engine waits for the configured ordering delay
/// between the mode and the payload, so the transport has applied the mode
/// before the payload is interpreted.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use lampcore::PanelConfig;
/// use lampcore::activation::{ActivationEngine, ActivationTarget};
/// use lampcore::channel::{MemoryChannel, Property, SingleChannel};
/// use lampcore::scene::{MemoryStorage, SavedDeviceState, SceneDraft, SceneStore};
/// use lampcore::types::HsvColour;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> lampcore::Result<()> {
/// let config = PanelConfig::default();
/// let store = Arc::new(SceneStore::load(Arc::new(MemoryStorage::new()), &config, Vec::new()));
/// let id = store.add(SceneDraft::new(
///     "Evening",
///     vec![SavedDeviceState::colour("D1", "Lamp1", HsvColour::new(300, 800, 500)?)],
/// ))?;
///
/// let channel = Arc::new(MemoryChannel::new());
/// let engine = ActivationEngine::new(
///     store.clone(),
///     Arc::new(SingleChannel::new(channel.clone())),
///     &config,
/// );
///
/// let report = engine.activate(&id, &ActivationTarget::device("D1")).await?;
/// assert!(report.is_complete());
/// assert_eq!(channel.writes_to(Property::ColourData).len(), 1);
/// assert_eq!(store.active_scene_id(), Some(id));
/// # Ok(())
/// # }
/// ```
pub struct ActivationEngine {
    store: Arc<SceneStore>,
    directory: Arc<dyn ChannelDirectory>,
    ordering_delay: Duration,
    dispatch: DispatchMode,
    mode: ModeSelector,
}

impl ActivationEngine {
    /// Creates an engine with a fresh mode selector.
    #[must_use]
    pub fn new(
        store: Arc<SceneStore>,
        directory: Arc<dyn ChannelDirectory>,
        config: &PanelConfig,
    ) -> Self {
        Self::with_mode_selector(store, directory, config, ModeSelector::default())
    }

    /// Creates an engine that pushes modes into an existing selector.
    #[must_use]
    pub fn with_mode_selector(
        store: Arc<SceneStore>,
        directory: Arc<dyn ChannelDirectory>,
        config: &PanelConfig,
        mode: ModeSelector,
    ) -> Self {
        Self {
            store,
            directory,
            ordering_delay: config.ordering_delay,
            dispatch: config.dispatch,
            mode,
        }
    }

    /// Returns the mode selector activations push into.
    #[must_use]
    pub fn mode_selector(&self) -> &ModeSelector {
        &self.mode
    }

    /// Activates a saved scene.
    ///
    /// A single-device scene is applied only to the entry of the selected
    /// lamp; a multi-device scene is applied to every entry. Steps the lamp
    /// cannot take are skipped and listed in the report. The scene becomes
    /// the active scene even when steps were skipped.
    ///
    /// # Errors
    ///
    /// Returns `SceneError::NotFound` for an unknown id; nothing is written.
    pub async fn activate(
        &self,
        id: &SceneId,
        target: &ActivationTarget,
    ) -> Result<ActivationReport> {
        let Some(scene) = self.store.by_id(id) else {
            tracing::warn!(id = %id, "activation of unknown scene");
            return Err(SceneError::NotFound(id.clone()).into());
        };

        let targets = targets(&scene, target);
        if targets.is_empty() {
            tracing::warn!(
                id = %id,
                selected = ?target.selected_device,
                "no scene entry matches the selected device"
            );
        }

        let mut devices = Vec::with_capacity(targets.len());
        for entry in &targets {
            devices.push(self.apply_entry(&scene, entry).await);
        }

        let mode = if scene.is_music() {
            WorkMode::Music
        } else {
            targets
                .first()
                .map_or_else(|| self.mode.current(), |entry| entry.mode.into())
        };
        self.store.set_active_scene(id.clone());
        self.mode.set(mode);
        self.store
            .events()
            .publish(SceneEvent::Activated { id: id.clone() });

        let report = ActivationReport {
            scene_id: id.clone(),
            mode,
            devices,
            dispatched: self.dispatch == DispatchMode::Live,
        };
        tracing::info!(
            id = %id,
            name = %scene.name,
            devices = report.devices.len(),
            steps = report.applied_count(),
            complete = report.is_complete(),
            "scene activated"
        );
        Ok(report)
    }

    async fn apply_entry(&self, scene: &SavedScene, entry: &SavedDeviceState) -> DeviceReport {
        let mut report = DeviceReport::new(&entry.device_id);
        let Some(channel) = self.directory.channel(&entry.device_id) else {
            tracing::warn!(device = %entry.device_id, "no channel for scene device, skipped");
            report.skip(None, SkipReason::Unreachable);
            return report;
        };

        if scene.is_music() {
            self.step(
                channel.as_ref(),
                ActivationStep::WorkMode(WorkMode::Music),
                &mut report,
            );
            return report;
        }

        let payload = match entry.mode {
            LightMode::Colour => entry.colour_payload().map(ActivationStep::Colour),
            LightMode::White => {
                entry
                    .white_payload()
                    .map(|(brightness, temperature)| ActivationStep::White {
                        brightness,
                        temperature,
                    })
            }
        };
        let Some(payload) = payload else {
            tracing::debug!(device = %entry.device_id, mode = %entry.mode, "entry has no payload");
            report.skip(None, SkipReason::NoPayload);
            return report;
        };

        let powered = channel
            .read(Property::SwitchLed)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !powered {
            self.step(channel.as_ref(), ActivationStep::PowerOn, &mut report);
        }

        self.step(
            channel.as_ref(),
            ActivationStep::WorkMode(entry.mode.into()),
            &mut report,
        );
        if (channel.is_group() || scene.is_multi_device) && !self.ordering_delay.is_zero() {
            tokio::time::sleep(self.ordering_delay).await;
        }
        self.step(channel.as_ref(), payload, &mut report);
        report
    }

    fn step(&self, channel: &dyn PropertyChannel, step: ActivationStep, report: &mut DeviceReport) {
        let (supported, missing): (Vec<_>, Vec<_>) = step
            .properties()
            .into_iter()
            .partition(|p| channel.is_supported(*p));
        if supported.is_empty() {
            if let Some(&property) = missing.first() {
                tracing::debug!(
                    device = %report.device_id,
                    step = %step,
                    property = %property,
                    "step skipped"
                );
                report.skip(Some(step), SkipReason::Unsupported(property));
            }
            return;
        }

        // A combined payload still goes out with the properties the lamp has.
        let mut applied = step;
        for &property in &missing {
            tracing::debug!(
                device = %report.device_id,
                step = %step,
                property = %property,
                "property dropped from step"
            );
            report.skip(Some(step), SkipReason::Unsupported(property));
            applied = applied.without(property);
        }

        if self.dispatch == DispatchMode::LocalOnly {
            tracing::debug!(
                device = %report.device_id,
                step = %applied,
                "local-only dispatch, write dropped"
            );
            report.applied.push(applied);
            return;
        }

        let mut request = request_for(step);
        request.entries.retain(|(p, _)| supported.contains(p));
        match channel.write(request) {
            Ok(()) => report.applied.push(applied),
            Err(ChannelError::Unsupported(property)) => {
                report.skip(Some(applied), SkipReason::Unsupported(property));
            }
            Err(ChannelError::Rejected(reason)) => {
                tracing::warn!(
                    device = %report.device_id,
                    step = %applied,
                    reason = %reason,
                    "step rejected"
                );
                report.skip(Some(applied), SkipReason::Rejected(reason));
            }
        }
    }
}

impl std::fmt::Debug for ActivationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationEngine")
            .field("ordering_delay", &self.ordering_delay)
            .field("dispatch", &self.dispatch)
            .field("mode", &self.mode.current())
            .finish_non_exhaustive()
    }
}

fn targets(scene: &SavedScene, target: &ActivationTarget) -> Vec<SavedDeviceState> {
    if scene.is_multi_device {
        return scene.devices.clone();
    }
    target
        .selected_device
        .as_deref()
        .and_then(|selected| scene.device(selected))
        .cloned()
        .into_iter()
        .collect()
}

fn request_for(step: ActivationStep) -> WriteRequest {
    match step {
        ActivationStep::PowerOn => {
            WriteRequest::single(Property::SwitchLed, PropertyValue::Bool(true))
                .with_options(WriteOptions::immediate())
        }
        ActivationStep::WorkMode(mode) => {
            WriteRequest::single(Property::WorkMode, PropertyValue::WorkMode(mode))
        }
        ActivationStep::Colour(colour) => {
            WriteRequest::single(Property::ColourData, PropertyValue::Colour(colour))
                .with_options(WriteOptions::immediate())
        }
        ActivationStep::White {
            brightness,
            temperature,
        } => {
            let mut entries = vec![(Property::BrightValue, PropertyValue::Level(brightness))];
            if let Some(temperature) = temperature {
                entries.push((Property::TempValue, PropertyValue::Level(temperature)));
            }
            WriteRequest::multi(entries).with_options(WriteOptions::immediate())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{MemoryChannel, SingleChannel};
    use crate::error::Error;
    use crate::scene::{MemoryStorage, SceneCategory, SceneDraft};
    use crate::types::{HsvColour, Level};

    fn setup(
        channel: &Arc<MemoryChannel>,
        config: &PanelConfig,
    ) -> (Arc<SceneStore>, ActivationEngine) {
        let store = Arc::new(SceneStore::load(
            Arc::new(MemoryStorage::new()),
            config,
            Vec::new(),
        ));
        let engine = ActivationEngine::new(
            store.clone(),
            Arc::new(SingleChannel::new(channel.clone())),
            config,
        );
        (store, engine)
    }

    fn white(id: &str) -> SavedDeviceState {
        SavedDeviceState::white(id, id, Level::clamped(800), Level::clamped(200))
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_scene_writes_nothing() {
        let channel = Arc::new(MemoryChannel::new());
        let (store, engine) = setup(&channel, &PanelConfig::default());

        let err = engine
            .activate(&SceneId::from("missing"), &ActivationTarget::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Scene(SceneError::NotFound(_))));
        assert!(channel.writes().is_empty());
        assert_eq!(store.active_scene_id(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn single_device_scene_targets_selected_entry() {
        let channel = Arc::new(MemoryChannel::new());
        let (_store, engine) = setup(&channel, &PanelConfig::default());
        let id = engine
            .store
            .add(SceneDraft::new("Pair", vec![white("Device1"), white("Device2")]))
            .unwrap();

        let report = engine
            .activate(&id, &ActivationTarget::device("Device2"))
            .await
            .unwrap();
        assert_eq!(report.devices.len(), 1);
        assert_eq!(report.devices[0].device_id, "Device2");
    }

    #[tokio::test(start_paused = true)]
    async fn white_payload_is_one_combined_write() {
        let channel = Arc::new(
            MemoryChannel::new().with_value(Property::SwitchLed, PropertyValue::Bool(true)),
        );
        let (_store, engine) = setup(&channel, &PanelConfig::default());
        let id = engine
            .store
            .add(SceneDraft::new("Read", vec![white("D1")]))
            .unwrap();

        engine
            .activate(&id, &ActivationTarget::device("D1"))
            .await
            .unwrap();

        let writes = channel.writes();
        assert_eq!(writes.len(), 2);
        assert!(writes[0].request.writes(Property::WorkMode));
        let payload = &writes[1].request;
        assert!(payload.writes(Property::BrightValue) && payload.writes(Property::TempValue));
        assert_eq!(engine.mode_selector().current(), WorkMode::White);
    }

    #[tokio::test(start_paused = true)]
    async fn brightness_only_lamp_keeps_brightness() {
        let channel = Arc::new(
            MemoryChannel::new()
                .with_value(Property::SwitchLed, PropertyValue::Bool(true))
                .without(Property::TempValue),
        );
        let (_store, engine) = setup(&channel, &PanelConfig::default());
        let id = engine
            .store
            .add(SceneDraft::new("Read", vec![white("D1")]))
            .unwrap();

        let report = engine
            .activate(&id, &ActivationTarget::device("D1"))
            .await
            .unwrap();

        let writes = channel.writes_to(Property::BrightValue);
        assert_eq!(writes.len(), 1);
        assert!(!writes[0].request.writes(Property::TempValue));
        let device = &report.devices[0];
        assert_eq!(
            device.applied.last(),
            Some(&ActivationStep::White {
                brightness: Level::clamped(800),
                temperature: None,
            })
        );
        assert_eq!(
            device.skipped[0].reason,
            SkipReason::Unsupported(Property::TempValue)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn music_scene_sets_music_mode_only() {
        let channel = Arc::new(MemoryChannel::new());
        let (_store, engine) = setup(&channel, &PanelConfig::default());
        let id = engine
            .store
            .add(
                SceneDraft::new("Party", vec![white("D1")])
                    .multi_device()
                    .with_category(SceneCategory::Music),
            )
            .unwrap();

        let report = engine.activate(&id, &ActivationTarget::default()).await.unwrap();
        assert_eq!(report.mode, WorkMode::Music);
        let writes = channel.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0].request.value_of(Property::WorkMode),
            Some(&PropertyValue::WorkMode(WorkMode::Music))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn local_only_sets_cursor_without_writes() {
        let channel = Arc::new(MemoryChannel::new());
        let config = PanelConfig::default().with_dispatch(DispatchMode::LocalOnly);
        let (store, engine) = setup(&channel, &config);
        let colour = HsvColour::new(10, 20, 30).unwrap();
        let id = store
            .add(SceneDraft::new(
                "Dim",
                vec![SavedDeviceState::colour("D1", "L", colour)],
            ))
            .unwrap();

        let report = engine
            .activate(&id, &ActivationTarget::device("D1"))
            .await
            .unwrap();
        assert!(!report.dispatched);
        assert!(channel.writes().is_empty());
        assert_eq!(store.active_scene_id(), Some(id));
    }
}
