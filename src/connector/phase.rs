// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// Lifecycle phase of a [`DeviceConnector`](super::DeviceConnector).
///
/// ```text
/// Unconfigured --probe ok, no token--> Pairing --token--> Polling
///      |                                                     |
///      +--probe ok, token--------------------------------> Polling --poll error--> Disconnected
/// ```
///
/// `Disconnected` is terminal; a new connector is created to reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionPhase {
    /// Created, not yet connected.
    #[default]
    Unconfigured,
    /// Registering with the device until the pairing button is pressed.
    Pairing,
    /// Periodically fetching the device status.
    Polling,
    /// Stopped after a poll failure or dispose.
    Disconnected,
}

impl ConnectionPhase {
    /// Returns the phase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Pairing => "pairing",
            Self::Polling => "polling",
            Self::Disconnected => "disconnected",
        }
    }

    /// Returns `true` while commands can be sent.
    #[must_use]
    pub const fn is_polling(self) -> bool {
        matches!(self, Self::Polling)
    }
}

impl fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
