// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fully validated result of one status poll.

use crate::types::{Percent, PowerState};

use super::HdmiField;

/// Attributes of one HDMI port as reported by a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdmiPort {
    /// Port name.
    pub name: String,
    /// Connected device type.
    pub kind: String,
    /// Connection status.
    pub status: String,
    /// Last sync mode used on this port.
    pub last_sync_mode: String,
}

impl HdmiPort {
    /// Returns the value of one field.
    #[must_use]
    pub fn get(&self, field: HdmiField) -> &str {
        match field {
            HdmiField::Name => &self.name,
            HdmiField::Type => &self.kind,
            HdmiField::Status => &self.status,
            HdmiField::LastMode => &self.last_sync_mode,
        }
    }
}

/// Every channel value carried by one status document.
///
/// A snapshot only exists once the whole document has been decoded, so
/// applying it never leaves the state half-updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Sync mode.
    pub mode: String,
    /// Intensity of `mode`, if the device reports settings for that mode.
    pub intensity: Option<String>,
    /// HDMI processing state.
    pub power: PowerState,
    /// Selected HDMI source.
    pub input: String,
    /// Light sync state.
    pub sync_status: PowerState,
    /// Brightness, already converted from the device scale.
    pub brightness: Percent,
    /// HDMI ports indexed by [`HdmiSlot`](super::HdmiSlot) order.
    pub hdmi: [HdmiPort; 5],
}
