// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// Why a device is offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusDetail {
    /// The user must fix the configuration.
    ConfigurationError,
    /// The device could not be reached; a reconnect is scheduled.
    CommunicationError,
}

/// Availability of the device as seen by its supervisor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ThingStatus {
    /// Initialized, no state received yet.
    #[default]
    Unknown,
    /// State is being received.
    Online,
    /// Not available.
    Offline {
        /// Category of the failure.
        detail: StatusDetail,
        /// Message for the user.
        message: String,
    },
}

impl ThingStatus {
    /// Creates an offline status.
    #[must_use]
    pub fn offline(detail: StatusDetail, message: impl Into<String>) -> Self {
        Self::Offline {
            detail,
            message: message.into(),
        }
    }

    /// Returns `true` if online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    /// Returns `true` if offline for any reason.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline { .. })
    }
}

impl fmt::Display for ThingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("UNKNOWN"),
            Self::Online => f.write_str("ONLINE"),
            Self::Offline { detail, message } => write!(f, "OFFLINE ({detail:?}): {message}"),
        }
    }
}
