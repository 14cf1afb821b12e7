// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optimistic lamp mirror for one interactive screen.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{AxisMachine, AxisPhase, GestureInput, PushOutcome, Throttle, ThrottleDecision};
use crate::channel::{
    ControlData, Property, PropertyChannel, PropertyValue, SubscriptionId, WriteOptions,
    WriteRequest,
};
use crate::config::{DispatchMode, PanelConfig};
use crate::error::{ChannelError, Result, ValueError};
use crate::state::{DeviceLightState, StateChange};
use crate::types::{HsvColour, Level, LightMode};

/// A gesture-controllable output axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// White brightness slider.
    Brightness,
    /// White temperature slider.
    Temperature,
    /// Colour wheel (hue and saturation).
    Colour,
}

impl Axis {
    /// Returns the axis name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Temperature => "temperature",
            Self::Colour => "colour",
        }
    }

    /// Returns the property a commit of this axis writes.
    #[must_use]
    pub const fn property(&self) -> Property {
        match self {
            Self::Brightness => Property::BrightValue,
            Self::Temperature => Property::TempValue,
            Self::Colour => Property::ColourData,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct AxisSlot<V> {
    machine: AxisMachine<V>,
    throttle: Throttle,
    flush: Option<JoinHandle<()>>,
}

impl<V: Copy + PartialEq> AxisSlot<V> {
    fn new(hardware: V, interval: Duration) -> Self {
        Self {
            machine: AxisMachine::new(hardware),
            throttle: Throttle::new(interval),
            flush: None,
        }
    }

    fn cancel_flush(&mut self) {
        if let Some(handle) = self.flush.take() {
            handle.abort();
        }
        self.throttle.cancel();
    }

    fn clear(&mut self) {
        self.cancel_flush();
        self.throttle.reset();
        self.machine.cancel();
    }
}

struct SessionState {
    mounted: bool,
    mode: LightMode,
    power: AxisMachine<bool>,
    brightness: AxisSlot<Level>,
    temperature: AxisSlot<Level>,
    colour: AxisSlot<HsvColour>,
}

impl SessionState {
    fn new(hardware: &DeviceLightState, interval: Duration) -> Self {
        Self {
            mounted: true,
            mode: hardware.mode,
            power: AxisMachine::new(hardware.power),
            brightness: AxisSlot::new(hardware.brightness, interval),
            temperature: AxisSlot::new(hardware.temperature, interval),
            colour: AxisSlot::new(hardware.colour, interval),
        }
    }

    fn mirror(&self) -> DeviceLightState {
        DeviceLightState {
            power: self.power.value(),
            mode: self.mode,
            brightness: self.brightness.machine.value(),
            temperature: self.temperature.machine.value(),
            colour: self.colour.machine.value(),
        }
    }

    fn throttle(&mut self, axis: Axis) -> &mut Throttle {
        match axis {
            Axis::Brightness => &mut self.brightness.throttle,
            Axis::Temperature => &mut self.temperature.throttle,
            Axis::Colour => &mut self.colour.throttle,
        }
    }

    fn flush_slot(&mut self, axis: Axis) -> &mut Option<JoinHandle<()>> {
        match axis {
            Axis::Brightness => &mut self.brightness.flush,
            Axis::Temperature => &mut self.temperature.flush,
            Axis::Colour => &mut self.colour.flush,
        }
    }

    fn phase(&mut self, axis: Axis, now: Instant) -> AxisPhase {
        match axis {
            Axis::Brightness => self.brightness.machine.phase_at(now),
            Axis::Temperature => self.temperature.machine.phase_at(now),
            Axis::Colour => self.colour.machine.phase_at(now),
        }
    }

    fn touch_start(&mut self, axis: Axis) {
        match axis {
            Axis::Brightness => self.brightness.machine.touch_start(),
            Axis::Temperature => self.temperature.machine.touch_start(),
            Axis::Colour => self.colour.machine.touch_start(),
        }
    }

    fn touch_move(&mut self, axis: Axis, input: GestureInput, now: Instant) -> Result<()> {
        match axis {
            Axis::Brightness => self.brightness.machine.touch_move(input.level()?, now),
            Axis::Temperature => self.temperature.machine.touch_move(input.level()?, now),
            Axis::Colour => {
                let colour = self.colour_from(input)?;
                self.colour.machine.touch_move(colour, now);
            }
        }
        Ok(())
    }

    fn touch_end(
        &mut self,
        axis: Axis,
        input: Option<GestureInput>,
        now: Instant,
        guard: Duration,
    ) -> Result<()> {
        match axis {
            Axis::Brightness => {
                let value = input.map(|i| i.level()).transpose()?;
                self.brightness.cancel_flush();
                self.brightness.machine.touch_end(value, now, guard);
            }
            Axis::Temperature => {
                let value = input.map(|i| i.level()).transpose()?;
                self.temperature.cancel_flush();
                self.temperature.machine.touch_end(value, now, guard);
            }
            Axis::Colour => {
                let value = input.map(|i| self.colour_from(i)).transpose()?;
                self.colour.cancel_flush();
                self.colour.machine.touch_end(value, now, guard);
            }
        }
        Ok(())
    }

    fn colour_from(&self, input: GestureInput) -> std::result::Result<HsvColour, ValueError> {
        let (hue, saturation) = input.hue_saturation()?;
        Ok(self
            .colour
            .machine
            .value()
            .with_hue_saturation(hue, saturation))
    }

    fn preview_request(&self, axis: Axis, preview: bool, interval: Duration) -> WriteRequest {
        let request = if preview {
            let data = match axis {
                Axis::Colour => ControlData::colour(self.colour.machine.value()),
                Axis::Brightness | Axis::Temperature => ControlData::white(
                    self.brightness.machine.value(),
                    self.temperature.machine.value(),
                ),
            };
            WriteRequest::single(Property::ControlData, PropertyValue::Control(data))
        } else {
            WriteRequest::single(axis.property(), self.axis_value(axis))
        };
        request.with_options(WriteOptions::throttled(interval))
    }

    fn commit_request(&self, axis: Axis) -> WriteRequest {
        WriteRequest::single(axis.property(), self.axis_value(axis))
            .with_options(WriteOptions::immediate())
    }

    fn axis_value(&self, axis: Axis) -> PropertyValue {
        match axis {
            Axis::Brightness => PropertyValue::Level(self.brightness.machine.value()),
            Axis::Temperature => PropertyValue::Level(self.temperature.machine.value()),
            Axis::Colour => PropertyValue::Colour(self.colour.machine.value()),
        }
    }

    fn on_push(&mut self, change: &StateChange, now: Instant) {
        for single in change.flatten() {
            let (name, outcome) = match single {
                StateChange::Power(on) => ("power", self.power.on_push(*on, now)),
                StateChange::Brightness(level) => (
                    Axis::Brightness.as_str(),
                    self.brightness.machine.on_push(*level, now),
                ),
                StateChange::Temperature(level) => (
                    Axis::Temperature.as_str(),
                    self.temperature.machine.on_push(*level, now),
                ),
                StateChange::Colour(colour) => (
                    Axis::Colour.as_str(),
                    self.colour.machine.on_push(*colour, now),
                ),
                StateChange::WorkMode(work_mode) => {
                    if let Some(mode) = work_mode.light_mode() {
                        self.mode = mode;
                    }
                    continue;
                }
                _ => continue,
            };
            if outcome == PushOutcome::Suppressed {
                tracing::debug!(axis = name, "hardware echo suppressed");
            }
        }
    }

    fn clear(&mut self) {
        self.power.cancel();
        self.brightness.clear();
        self.temperature.clear();
        self.colour.clear();
    }

    fn resync(&mut self, hardware: &DeviceLightState) {
        self.clear();
        self.mode = hardware.mode;
        self.power.resync(hardware.power);
        self.brightness.machine.resync(hardware.brightness);
        self.temperature.machine.resync(hardware.temperature);
        self.colour.machine.resync(hardware.colour);
    }
}

struct Shared {
    channel: Arc<dyn PropertyChannel>,
    throttle_interval: Duration,
    echo_guard: Duration,
    dispatch: DispatchMode,
    preview: bool,
    state: Mutex<SessionState>,
}

impl Shared {
    fn dispatch(&self, request: WriteRequest) -> std::result::Result<(), ChannelError> {
        let codes: Vec<String> = request.properties().map(|p| p.code()).collect();
        if let Some(missing) = request.properties().find(|p| !self.channel.is_supported(*p)) {
            tracing::warn!(property = %missing, "property not supported, write dropped");
            return Err(ChannelError::Unsupported(missing));
        }
        if self.dispatch == DispatchMode::LocalOnly {
            tracing::debug!(properties = ?codes, "local-only dispatch, write dropped");
            return Ok(());
        }

        let immediate = request.options.immediate;
        match self.channel.write(request) {
            Ok(()) => {
                tracing::debug!(properties = ?codes, immediate, "write sent");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, properties = ?codes, "write dropped");
                Err(e)
            }
        }
    }

    fn flush(&self, axis: Axis) {
        let request = {
            let mut state = self.state.lock();
            let now = Instant::now();
            // this task owns the handle
            state.flush_slot(axis).take();
            if !state.throttle(axis).flush(now) || state.phase(axis, now) != AxisPhase::Touching {
                return;
            }
            state.preview_request(axis, self.preview, self.throttle_interval)
        };
        // failures are already logged; trailing flushes are not retried
        let _ = self.dispatch(request);
    }

    fn on_push(&self, change: &StateChange) {
        let mut state = self.state.lock();
        if state.mounted {
            state.on_push(change, Instant::now());
        }
    }
}

fn spawn_flush(shared: &Arc<Shared>, axis: Axis, delay: Duration) -> Option<JoinHandle<()>> {
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!(axis = %axis, "no runtime for trailing flush, value held until release");
        return None;
    };
    let weak: Weak<Shared> = Arc::downgrade(shared);
    Some(runtime.spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(shared) = weak.upgrade() {
            shared.flush(axis);
        }
    }))
}

/// Optimistic local mirror of one lamp, reconciled with hardware pushes.
///
/// A session is mounted when an interactive screen opens and torn down when
/// it closes (or dropped). Gestures update the mirror synchronously; the
/// outbound writes they cause are throttled per axis, and the final value of
/// every gesture is committed as an immediate write. Hardware pushes update
/// the mirror only on axes no gesture owns.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use lampcore::PanelConfig;
/// use lampcore::channel::MemoryChannel;
/// use lampcore::reconcile::{Axis, GestureInput, ReconcileSession};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> lampcore::Result<()> {
/// let channel = Arc::new(MemoryChannel::new());
/// let session = ReconcileSession::mount(channel.clone(), &PanelConfig::default());
///
/// session.touch_start(Axis::Brightness);
/// session.touch_move(Axis::Brightness, GestureInput::slider(420.0))?;
/// assert_eq!(session.state().brightness.value(), 420);
///
/// session.touch_end(Axis::Brightness, None)?;
/// assert!(channel.writes().last().unwrap().request.options.immediate);
/// # Ok(())
/// # }
/// ```
pub struct ReconcileSession {
    shared: Arc<Shared>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl ReconcileSession {
    /// Seeds the mirror from the channel and subscribes to hardware pushes.
    #[must_use]
    pub fn mount(channel: Arc<dyn PropertyChannel>, config: &PanelConfig) -> Self {
        let hardware = channel.read_state();
        let preview = channel.is_supported(Property::ControlData);
        let shared = Arc::new(Shared {
            channel: channel.clone(),
            throttle_interval: config.throttle_interval,
            echo_guard: config.echo_guard,
            dispatch: config.dispatch,
            preview,
            state: Mutex::new(SessionState::new(&hardware, config.throttle_interval)),
        });

        let weak = Arc::downgrade(&shared);
        let id = channel.subscribe(Arc::new(move |change: &StateChange| {
            if let Some(shared) = weak.upgrade() {
                shared.on_push(change);
            }
        }));
        tracing::info!(preview, subscription = %id, "reconcile session mounted");

        Self {
            shared,
            subscription: Mutex::new(Some(id)),
        }
    }

    /// Returns the mirror to render.
    #[must_use]
    pub fn state(&self) -> DeviceLightState {
        self.shared.state.lock().mirror()
    }

    /// Returns the phase of an axis.
    #[must_use]
    pub fn phase(&self, axis: Axis) -> AxisPhase {
        self.shared.state.lock().phase(axis, Instant::now())
    }

    /// Returns `true` while a trailing flush of the axis is scheduled.
    #[must_use]
    pub fn has_pending_flush(&self, axis: Axis) -> bool {
        self.shared.state.lock().flush_slot(axis).is_some()
    }

    /// Returns `true` until the session is torn down.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.state.lock().mounted
    }

    /// Starts a gesture on an axis.
    pub fn touch_start(&self, axis: Axis) {
        let mut state = self.shared.state.lock();
        if state.mounted {
            state.touch_start(axis);
        }
    }

    /// Shows a gesture value and sends it through the axis throttle.
    ///
    /// Starts the gesture if `touch_start` was not called.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for invalid input (the mirror is unchanged) and
    /// `Error::Channel` if the write was dropped (the mirror still shows the
    /// value).
    pub fn touch_move(&self, axis: Axis, input: GestureInput) -> Result<()> {
        let now = Instant::now();
        let request = {
            let mut state = self.shared.state.lock();
            if !state.mounted {
                tracing::debug!(axis = %axis, "gesture after teardown ignored");
                return Ok(());
            }
            state.touch_move(axis, input, now)?;
            match state.throttle(axis).offer(now) {
                ThrottleDecision::SendNow => Some(state.preview_request(
                    axis,
                    self.shared.preview,
                    self.shared.throttle_interval,
                )),
                ThrottleDecision::Schedule(delay) => {
                    let handle = spawn_flush(&self.shared, axis, delay);
                    if handle.is_none() {
                        state.throttle(axis).cancel();
                    }
                    *state.flush_slot(axis) = handle;
                    None
                }
                ThrottleDecision::Coalesced => None,
            }
        };

        match request {
            Some(request) => Ok(self.shared.dispatch(request)?),
            None => Ok(()),
        }
    }

    /// Ends a gesture and commits its final value as an immediate write.
    ///
    /// With `None`, the last shown value is committed. Any scheduled flush is
    /// cancelled, and hardware pushes stay suppressed for the echo guard.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for invalid input and `Error::Channel` if the
    /// write was dropped.
    pub fn touch_end(&self, axis: Axis, input: Option<GestureInput>) -> Result<()> {
        let now = Instant::now();
        let request = {
            let mut state = self.shared.state.lock();
            if !state.mounted {
                tracing::debug!(axis = %axis, "gesture after teardown ignored");
                return Ok(());
            }
            state.touch_end(axis, input, now, self.shared.echo_guard)?;
            state.commit_request(axis)
        };
        Ok(self.shared.dispatch(request)?)
    }

    /// Toggles the lamp and returns the new power state.
    ///
    /// The power axis is guarded like a committed gesture.
    ///
    /// # Errors
    ///
    /// Returns `Error::Channel` if the write was dropped.
    pub fn toggle_power(&self) -> Result<bool> {
        let now = Instant::now();
        let (on, request) = {
            let mut state = self.shared.state.lock();
            let on = !state.power.value();
            if !state.mounted {
                return Ok(!on);
            }
            state.power.touch_end(Some(on), now, self.shared.echo_guard);
            let request = WriteRequest::single(Property::SwitchLed, PropertyValue::Bool(on))
                .with_options(WriteOptions::immediate());
            (on, request)
        };
        self.shared.dispatch(request)?;
        Ok(on)
    }

    /// Switches between white and colour output.
    ///
    /// # Errors
    ///
    /// Returns `Error::Channel` if the write was dropped.
    pub fn set_mode(&self, mode: LightMode) -> Result<()> {
        {
            let mut state = self.shared.state.lock();
            if !state.mounted {
                return Ok(());
            }
            state.mode = mode;
        }
        let request =
            WriteRequest::single(Property::WorkMode, PropertyValue::WorkMode(mode.into()))
                .with_options(WriteOptions::immediate());
        Ok(self.shared.dispatch(request)?)
    }

    /// Resets the mirror to the hardware-reported state.
    ///
    /// Drops every gesture, guard and scheduled flush.
    pub fn resync(&self) {
        let hardware = self.shared.channel.read_state();
        let mut state = self.shared.state.lock();
        if state.mounted {
            state.resync(&hardware);
            tracing::info!("mirror resynced from hardware");
        }
    }

    /// Cancels scheduled flushes, clears guards and unsubscribes.
    ///
    /// Later gestures and pushes are ignored. Calling it again does nothing.
    pub fn teardown(&self) {
        let Some(id) = self.subscription.lock().take() else {
            return;
        };
        {
            let mut state = self.shared.state.lock();
            state.mounted = false;
            state.clear();
        }
        self.shared.channel.unsubscribe(id);
        tracing::info!(subscription = %id, "reconcile session torn down");
    }
}

impl Drop for ReconcileSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for ReconcileSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconcileSession")
            .field("mounted", &self.is_mounted())
            .field("preview", &self.shared.preview)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use crate::error::Error;

    fn mounted(channel: &Arc<MemoryChannel>) -> ReconcileSession {
        ReconcileSession::mount(channel.clone(), &PanelConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn mount_seeds_from_hardware() {
        let channel = Arc::new(
            MemoryChannel::new()
                .with_value(Property::SwitchLed, PropertyValue::Bool(true))
                .with_value(Property::BrightValue, PropertyValue::Level(Level::clamped(250))),
        );
        let session = mounted(&channel);

        assert!(session.state().power);
        assert_eq!(session.state().brightness.value(), 250);
        assert_eq!(channel.subscriber_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn move_writes_preview_payload() {
        let channel = Arc::new(MemoryChannel::new());
        let session = mounted(&channel);

        session
            .touch_move(Axis::Colour, GestureInput::wheel(120.0, 500.0))
            .unwrap();

        let writes = channel.writes();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].request.writes(Property::ControlData));
        assert!(!writes[0].request.options.immediate);
    }

    #[tokio::test(start_paused = true)]
    async fn move_without_preview_writes_axis_property() {
        let channel = Arc::new(MemoryChannel::new().without(Property::ControlData));
        let session = mounted(&channel);

        session
            .touch_move(Axis::Temperature, GestureInput::slider(100.0))
            .unwrap();

        let writes = channel.writes();
        assert_eq!(
            writes[0].request.value_of(Property::TempValue),
            Some(&PropertyValue::Level(Level::clamped(100)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_input_leaves_mirror() {
        let channel = Arc::new(MemoryChannel::new());
        let session = mounted(&channel);
        let before = session.state();

        let err = session
            .touch_move(Axis::Brightness, GestureInput::slider(f64::NAN))
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::NotFinite)));
        assert_eq!(session.state(), before);
        assert!(channel.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unsupported_commit_is_reported() {
        let channel = Arc::new(MemoryChannel::new().without(Property::TempValue));
        let session = mounted(&channel);

        let err = session
            .touch_end(Axis::Temperature, Some(GestureInput::slider(10.0)))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Channel(ChannelError::Unsupported(Property::TempValue))
        ));
        assert_eq!(session.state().temperature.value(), 10);
        assert!(channel.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_power_is_guarded() {
        let channel = Arc::new(MemoryChannel::new());
        let session = mounted(&channel);

        assert!(session.toggle_power().unwrap());
        channel.push(&StateChange::Power(false));
        assert!(session.state().power);

        tokio::time::advance(Duration::from_millis(1001)).await;
        channel.push(&StateChange::Power(false));
        assert!(!session.state().power);
    }

    #[tokio::test(start_paused = true)]
    async fn set_mode_writes_work_mode() {
        let channel = Arc::new(MemoryChannel::new());
        let session = mounted(&channel);

        session.set_mode(LightMode::Colour).unwrap();
        assert_eq!(session.state().mode, LightMode::Colour);
        assert_eq!(
            channel.writes()[0].request.value_of(Property::WorkMode),
            Some(&PropertyValue::WorkMode(crate::types::WorkMode::Colour))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn local_only_dispatch_drops_writes() {
        let channel = Arc::new(MemoryChannel::new());
        let config = PanelConfig::default().with_dispatch(DispatchMode::LocalOnly);
        let session = ReconcileSession::mount(channel.clone(), &config);

        session
            .touch_end(Axis::Brightness, Some(GestureInput::slider(700.0)))
            .unwrap();
        assert_eq!(session.state().brightness.value(), 700);
        assert!(channel.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_unsubscribes() {
        let channel = Arc::new(MemoryChannel::new());
        let session = mounted(&channel);
        drop(session);
        assert_eq!(channel.subscriber_count(), 0);
    }
}
