// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::types::{Percent, PowerState};

use super::{ChannelKey, ChannelValue, HdmiField, HdmiSlot, StatusSnapshot};

/// Attributes of one HDMI port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HdmiPortState {
    name: Option<String>,
    kind: Option<String>,
    status: Option<String>,
    last_mode: Option<String>,
}

impl HdmiPortState {
    fn field(&self, field: HdmiField) -> Option<&String> {
        match field {
            HdmiField::Name => self.name.as_ref(),
            HdmiField::Type => self.kind.as_ref(),
            HdmiField::Status => self.status.as_ref(),
            HdmiField::LastMode => self.last_mode.as_ref(),
        }
    }

    fn field_mut(&mut self, field: HdmiField) -> &mut Option<String> {
        match field {
            HdmiField::Name => &mut self.name,
            HdmiField::Type => &mut self.kind,
            HdmiField::Status => &mut self.status,
            HdmiField::LastMode => &mut self.last_mode,
        }
    }
}

/// Latest known state of a sync box.
///
/// All fields are optional because state is unknown until the device
/// reports it. Every setter is set-if-changed and returns whether the stored
/// value actually changed. Writing to a field that was never set always
/// counts as a change.
///
/// # Examples
///
/// ```
/// use huesync_lib::state::{ChannelKey, ChannelValue, DeviceState};
/// use huesync_lib::types::PowerState;
///
/// let mut state = DeviceState::new();
/// assert!(state.set_power(PowerState::On));
/// assert!(!state.set_power(PowerState::On));
/// assert_eq!(
///     state.get(ChannelKey::Power),
///     Some(ChannelValue::Switch(PowerState::On))
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    power: Option<PowerState>,
    mode: Option<String>,
    intensity: Option<String>,
    brightness: Option<Percent>,
    input: Option<String>,
    sync_status: Option<PowerState>,
    hdmi: [HdmiPortState; 5],
}

/// Stores `value` into `slot` unless it is already equal.
fn replace_if_changed<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        false
    } else {
        *slot = Some(value);
        true
    }
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of a channel, or `None` if not yet known.
    #[must_use]
    pub fn get(&self, channel: ChannelKey) -> Option<ChannelValue> {
        match channel {
            ChannelKey::Power => self.power.map(ChannelValue::Switch),
            ChannelKey::Mode => self.mode.clone().map(ChannelValue::Text),
            ChannelKey::Intensity => self.intensity.clone().map(ChannelValue::Text),
            ChannelKey::Brightness => self.brightness.map(ChannelValue::Percent),
            ChannelKey::Input => self.input.clone().map(ChannelValue::Text),
            ChannelKey::SyncStatus => self.sync_status.map(ChannelValue::Switch),
            ChannelKey::Hdmi(slot, field) => self.hdmi[slot.index()]
                .field(field)
                .cloned()
                .map(ChannelValue::Text),
        }
    }

    /// Returns the HDMI processing state.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.power
    }

    /// Returns the light sync state.
    #[must_use]
    pub fn sync_status(&self) -> Option<PowerState> {
        self.sync_status
    }

    /// Returns the brightness.
    #[must_use]
    pub fn brightness(&self) -> Option<Percent> {
        self.brightness
    }

    /// Returns the sync mode.
    #[must_use]
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    /// Sets the HDMI processing state.
    pub fn set_power(&mut self, state: PowerState) -> bool {
        replace_if_changed(&mut self.power, state)
    }

    /// Sets the sync mode.
    pub fn set_mode(&mut self, mode: &str) -> bool {
        replace_if_changed(&mut self.mode, mode.to_string())
    }

    /// Sets the intensity of the current mode.
    pub fn set_intensity(&mut self, intensity: &str) -> bool {
        replace_if_changed(&mut self.intensity, intensity.to_string())
    }

    /// Sets the brightness.
    pub fn set_brightness(&mut self, brightness: Percent) -> bool {
        replace_if_changed(&mut self.brightness, brightness)
    }

    /// Sets the selected HDMI source.
    pub fn set_input(&mut self, input: &str) -> bool {
        replace_if_changed(&mut self.input, input.to_string())
    }

    /// Sets the light sync state.
    pub fn set_sync_status(&mut self, state: PowerState) -> bool {
        replace_if_changed(&mut self.sync_status, state)
    }

    /// Sets one attribute of an HDMI port.
    pub fn set_hdmi(&mut self, slot: HdmiSlot, field: HdmiField, value: &str) -> bool {
        replace_if_changed(
            self.hdmi[slot.index()].field_mut(field),
            value.to_string(),
        )
    }

    /// Applies every field of a poll result, in channel order.
    ///
    /// Returns the channels whose value changed. Intensity is only applied
    /// when the snapshot carries one for the current mode.
    pub fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) -> Vec<ChannelKey> {
        let mut changed = Vec::new();
        let mut track = |key: ChannelKey, did_change: bool| {
            if did_change {
                changed.push(key);
            }
        };

        track(ChannelKey::Mode, self.set_mode(&snapshot.mode));
        if let Some(intensity) = &snapshot.intensity {
            track(ChannelKey::Intensity, self.set_intensity(intensity));
        }
        track(ChannelKey::Power, self.set_power(snapshot.power));
        track(ChannelKey::Input, self.set_input(&snapshot.input));
        track(ChannelKey::SyncStatus, self.set_sync_status(snapshot.sync_status));
        track(ChannelKey::Brightness, self.set_brightness(snapshot.brightness));

        for slot in HdmiSlot::ALL {
            let port = &snapshot.hdmi[slot.index()];
            for field in HdmiField::ALL {
                let did_change = self.set_hdmi(slot, field, port.get(field));
                track(ChannelKey::Hdmi(slot, field), did_change);
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HdmiPort;

    fn snapshot() -> StatusSnapshot {
        let port = |name: &str| HdmiPort {
            name: name.to_string(),
            kind: "video".to_string(),
            status: "plugged".to_string(),
            last_sync_mode: "video".to_string(),
        };
        StatusSnapshot {
            mode: "video".to_string(),
            intensity: Some("high".to_string()),
            power: PowerState::On,
            input: "input1".to_string(),
            sync_status: PowerState::Off,
            brightness: Percent::new(50).unwrap(),
            hdmi: [port("PC"), port("TV"), port("HDMI 3"), port("HDMI 4"), port("Out")],
        }
    }

    #[test]
    fn new_state_is_empty() {
        let state = DeviceState::new();
        for key in ChannelKey::ALL {
            assert!(state.get(key).is_none(), "{key} should be unknown");
        }
    }

    #[test]
    fn first_write_always_changes() {
        let mut state = DeviceState::new();
        assert!(state.set_mode("video"));
        assert!(state.set_hdmi(HdmiSlot::Input4, HdmiField::Type, ""));
    }

    #[test]
    fn equal_values_do_not_change() {
        let mut state = DeviceState::new();
        assert!(state.set_brightness(Percent::new(10).unwrap()));
        assert!(!state.set_brightness(Percent::new(10).unwrap()));
        assert!(state.set_brightness(Percent::new(11).unwrap()));

        assert!(state.set_input("input2"));
        assert!(!state.set_input(&String::from("input2")));
    }

    #[test]
    fn snapshot_reports_every_channel_once() {
        let mut state = DeviceState::new();
        let changed = state.apply_snapshot(&snapshot());
        let mut expected = vec![
            ChannelKey::Mode,
            ChannelKey::Intensity,
            ChannelKey::Power,
            ChannelKey::Input,
            ChannelKey::SyncStatus,
            ChannelKey::Brightness,
        ];
        expected.extend_from_slice(&ChannelKey::ALL[6..]);
        assert_eq!(changed, expected);

        assert!(state.apply_snapshot(&snapshot()).is_empty());
    }

    #[test]
    fn snapshot_without_intensity_keeps_previous_intensity() {
        let mut state = DeviceState::new();
        state.apply_snapshot(&snapshot());

        let mut next = snapshot();
        next.mode = "passthrough".to_string();
        next.intensity = None;
        let changed = state.apply_snapshot(&next);

        assert_eq!(changed, vec![ChannelKey::Mode]);
        assert_eq!(
            state.get(ChannelKey::Intensity),
            Some(ChannelValue::Text("high".to_string()))
        );
    }
}
