// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands for the sync box.
//!
//! A [`Command`] is what a consumer sends to a channel. [`ExecCommand`] is
//! the single-field JSON patch sent to the device's `/execution` endpoint.
//! [`to_exec_command`] maps one onto the other.
//!
//! # Examples
//!
//! ```
//! use huesync_lib::command::{Command, ExecCommand, to_exec_command};
//! use huesync_lib::state::ChannelKey;
//!
//! let exec = to_exec_command(ChannelKey::Brightness, &Command::Number(40.0))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(exec, ExecCommand::Brightness(80));
//! assert_eq!(exec.to_json(), r#"{"brightness":80}"#);
//!
//! // Refresh needs no device call
//! assert!(to_exec_command(ChannelKey::Mode, &Command::Refresh).unwrap().is_none());
//! ```

mod exec;

pub use exec::ExecCommand;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::state::ChannelKey;
use crate::types::{PowerState, brightness_to_device_scale};

/// A command addressed to a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Re-read the channel. Polling refreshes all channels together, so this
    /// never reaches the device.
    Refresh,
    /// Switch on or off.
    Switch(PowerState),
    /// Numeric value, e.g. a brightness percentage.
    Number(f64),
    /// Free text value, e.g. a mode or input name.
    Text(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refresh => f.write_str("REFRESH"),
            Self::Switch(state) => write!(f, "{state}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    /// Parses `REFRESH`, `ON`/`OFF`, numbers, and otherwise keeps the text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("refresh") {
            return Ok(Self::Refresh);
        }
        if trimmed.eq_ignore_ascii_case("on") {
            return Ok(Self::Switch(PowerState::On));
        }
        if trimmed.eq_ignore_ascii_case("off") {
            return Ok(Self::Switch(PowerState::Off));
        }
        if let Ok(value) = trimmed.parse::<f64>()
            && value.is_finite()
        {
            return Ok(Self::Number(value));
        }
        Ok(Self::Text(trimmed.to_string()))
    }
}

impl From<PowerState> for Command {
    fn from(state: PowerState) -> Self {
        Self::Switch(state)
    }
}

/// Maps a channel command to the `/execution` patch that carries it.
///
/// Returns `Ok(None)` for [`Command::Refresh`].
///
/// # Errors
///
/// Returns `Error::UnsupportedCommand` if the channel is read-only or does
/// not accept this kind of command.
pub fn to_exec_command(channel: ChannelKey, command: &Command) -> Result<Option<ExecCommand>, Error> {
    let unsupported = || Error::UnsupportedCommand {
        channel,
        command: command.to_string(),
    };

    let exec = match (channel, command) {
        (_, Command::Refresh) => return Ok(None),

        (ChannelKey::Power, Command::Switch(state)) => ExecCommand::HdmiActive(state.is_on()),
        // Switching brightness toggles light sync
        (ChannelKey::SyncStatus | ChannelKey::Brightness, Command::Switch(state)) => {
            ExecCommand::SyncActive(state.is_on())
        }
        (ChannelKey::Brightness, Command::Number(value)) => {
            ExecCommand::Brightness(brightness_to_device_scale(*value)?)
        }

        (ChannelKey::Mode, Command::Text(mode)) => ExecCommand::Mode(mode.clone()),
        (ChannelKey::Intensity, Command::Text(intensity)) => {
            ExecCommand::Intensity(intensity.clone())
        }
        (ChannelKey::Input, Command::Text(source)) => ExecCommand::HdmiSource(source.clone()),

        _ => return Err(unsupported()),
    };

    Ok(Some(exec))
}
