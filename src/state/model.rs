// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared, notifying device state.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::EventSink;
use crate::types::{Percent, PowerState};

use super::{ChannelKey, ChannelValue, DeviceState, HdmiField, HdmiSlot, StatusSnapshot};

/// Device state shared between a connector and its owner.
///
/// Every setter is set-if-changed: the sink receives exactly one
/// [`EventSink::state_changed`] call per accepted change, before the setter
/// returns. The lock is released before the sink is called, so a sink may
/// read back through [`get`](Self::get).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use huesync_lib::event::EventSink;
/// use huesync_lib::state::{ChannelKey, ChannelValue, DeviceStateModel};
///
/// struct Printer;
///
/// impl EventSink for Printer {
///     fn state_changed(&self, channel: ChannelKey, value: &ChannelValue) {
///         println!("{channel} = {value}");
///     }
///     fn connection_error(&self, message: &str) {
///         eprintln!("{message}");
///     }
/// }
///
/// let model = DeviceStateModel::new(Arc::new(Printer));
/// model.set_mode("video"); // prints "mode = video"
/// model.set_mode("video"); // prints nothing
/// ```
pub struct DeviceStateModel {
    state: RwLock<DeviceState>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for DeviceStateModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStateModel")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl DeviceStateModel {
    /// Creates an empty model reporting to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            state: RwLock::new(DeviceState::new()),
            sink,
        }
    }

    /// Returns the current value of a channel.
    #[must_use]
    pub fn get(&self, channel: ChannelKey) -> Option<ChannelValue> {
        self.state.read().get(channel)
    }

    /// Returns the current value of a channel by its string identifier.
    ///
    /// Unknown identifiers return `None`.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<ChannelValue> {
        id.parse().ok().and_then(|channel| self.get(channel))
    }

    /// Returns a copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> DeviceState {
        self.state.read().clone()
    }

    fn update(&self, channel: ChannelKey, apply: impl FnOnce(&mut DeviceState) -> bool) {
        let value = {
            let mut state = self.state.write();
            if !apply(&mut state) {
                return;
            }
            state.get(channel)
        };
        if let Some(value) = value {
            self.sink.state_changed(channel, &value);
        }
    }

    /// Sets the HDMI processing state.
    pub fn set_power(&self, on: bool) {
        self.update(ChannelKey::Power, |s| s.set_power(PowerState::from(on)));
    }

    /// Sets the sync mode.
    pub fn set_mode(&self, mode: &str) {
        self.update(ChannelKey::Mode, |s| s.set_mode(mode));
    }

    /// Sets the intensity.
    pub fn set_intensity(&self, intensity: &str) {
        self.update(ChannelKey::Intensity, |s| s.set_intensity(intensity));
    }

    /// Sets the brightness.
    pub fn set_brightness(&self, brightness: Percent) {
        self.update(ChannelKey::Brightness, |s| s.set_brightness(brightness));
    }

    /// Sets the selected HDMI source.
    pub fn set_input(&self, input: &str) {
        self.update(ChannelKey::Input, |s| s.set_input(input));
    }

    /// Sets the light sync state.
    pub fn set_sync_status(&self, on: bool) {
        self.update(ChannelKey::SyncStatus, |s| {
            s.set_sync_status(PowerState::from(on))
        });
    }

    /// Sets one attribute of an HDMI port.
    pub fn set_hdmi(&self, slot: HdmiSlot, field: HdmiField, value: &str) {
        self.update(ChannelKey::Hdmi(slot, field), |s| {
            s.set_hdmi(slot, field, value)
        });
    }

    /// Applies a whole poll result under one lock, then notifies every
    /// changed channel in order.
    pub fn apply_snapshot(&self, snapshot: &StatusSnapshot) {
        let changes: Vec<(ChannelKey, ChannelValue)> = {
            let mut state = self.state.write();
            state
                .apply_snapshot(snapshot)
                .into_iter()
                .filter_map(|channel| state.get(channel).map(|value| (channel, value)))
                .collect()
        };

        for (channel, value) in changes {
            self.sink.state_changed(channel, &value);
        }
    }

    /// Forwards a connection error to the sink.
    pub fn report_connection_error(&self, message: &str) {
        self.sink.connection_error(message);
    }

    /// Forwards a freshly acquired access token to the sink.
    pub fn report_access_token(&self, token: &str) {
        self.sink.access_token_acquired(token);
    }

    /// Forwards a pairing instruction to the sink.
    pub fn report_pairing_prompt(&self, message: &str) {
        self.sink.pairing_prompt(message);
    }
}
