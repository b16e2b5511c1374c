// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Receiver side of device state notifications.

use crate::state::{ChannelKey, ChannelValue};

/// Receives notifications raised by a [`DeviceStateModel`](crate::state::DeviceStateModel).
///
/// The sink is passed into the model at construction. Callbacks run on the
/// connector's tasks and must not block for long. They must also not
/// dispose the connector synchronously from [`state_changed`](Self::state_changed);
/// [`connection_error`](Self::connection_error) is always raised without
/// any connector lock held and may tear the connector down.
pub trait EventSink: Send + Sync {
    /// A channel took a new value.
    fn state_changed(&self, channel: ChannelKey, value: &ChannelValue);

    /// The connection to the device was lost or could not be established.
    fn connection_error(&self, message: &str);

    /// Pairing produced a new access token.
    fn access_token_acquired(&self, _token: &str) {}

    /// The device is waiting for the user to press its pairing button.
    fn pairing_prompt(&self, _message: &str) {}
}
