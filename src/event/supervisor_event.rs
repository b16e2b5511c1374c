// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events published by the connection supervisor.

use crate::state::{ChannelKey, ChannelValue};
use crate::supervisor::ThingStatus;

/// Events emitted by a [`ConnectionSupervisor`](crate::supervisor::ConnectionSupervisor).
///
/// # Examples
///
/// ```
/// use huesync_lib::event::SupervisorEvent;
/// use huesync_lib::state::{ChannelKey, ChannelValue};
/// use huesync_lib::supervisor::ThingStatus;
///
/// let event = SupervisorEvent::StateChanged {
///     channel: ChannelKey::Mode,
///     value: ChannelValue::Text("video".into()),
/// };
/// assert!(event.is_state_change());
/// assert!(!SupervisorEvent::StatusChanged { status: ThingStatus::Online }.is_state_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A channel took a new value.
    StateChanged {
        /// The channel.
        channel: ChannelKey,
        /// Its new value.
        value: ChannelValue,
    },

    /// The device status changed.
    StatusChanged {
        /// The new status.
        status: ThingStatus,
    },

    /// A new access token was written to the configuration store.
    TokenChanged {
        /// The token.
        token: String,
    },

    /// The device waits for its pairing button to be pressed.
    PairingRequired {
        /// Instruction for the user.
        message: String,
    },
}

impl SupervisorEvent {
    /// Returns `true` if this is a channel state change.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` if this is a status change.
    #[must_use]
    pub fn is_status_change(&self) -> bool {
        matches!(self, Self::StatusChanged { .. })
    }
}
