// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel keys and typed channel values.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::types::{Percent, PowerState};

/// One of the five HDMI ports reported by the sync box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HdmiSlot {
    /// HDMI input 1.
    Input1,
    /// HDMI input 2.
    Input2,
    /// HDMI input 3.
    Input3,
    /// HDMI input 4.
    Input4,
    /// HDMI output.
    Output,
}

impl HdmiSlot {
    /// All slots in device order.
    pub const ALL: [Self; 5] = [
        Self::Input1,
        Self::Input2,
        Self::Input3,
        Self::Input4,
        Self::Output,
    ];

    /// Returns the key used for this slot in the device's `hdmi` object.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input1 => "input1",
            Self::Input2 => "input2",
            Self::Input3 => "input3",
            Self::Input4 => "input4",
            Self::Output => "output",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Attribute of an HDMI port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HdmiField {
    /// User-assigned port name.
    Name,
    /// Device type connected to the port.
    Type,
    /// Connection status (e.g. `plugged`, `unplugged`).
    Status,
    /// Last sync mode used with this port.
    LastMode,
}

impl HdmiField {
    /// All fields in channel order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Type, Self::Status, Self::LastMode];

    const fn suffix(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Type => "Type",
            Self::Status => "Status",
            Self::LastMode => "LastMode",
        }
    }
}

/// Logical identifier of one exposed device attribute.
///
/// Channel keys render to, and parse from, their string identifiers:
///
/// ```
/// use huesync_lib::state::{ChannelKey, HdmiField, HdmiSlot};
///
/// assert_eq!(ChannelKey::SyncStatus.to_string(), "syncStatus");
///
/// let key: ChannelKey = "input2Status".parse().unwrap();
/// assert_eq!(key, ChannelKey::Hdmi(HdmiSlot::Input2, HdmiField::Status));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKey {
    /// HDMI processing on/off.
    Power,
    /// Sync mode (`video`, `music`, `game`, `passthrough`, `powersave`).
    Mode,
    /// Intensity of the current mode.
    Intensity,
    /// Brightness in percent.
    Brightness,
    /// Selected HDMI source.
    Input,
    /// Light sync on/off.
    SyncStatus,
    /// Attribute of an HDMI port.
    Hdmi(HdmiSlot, HdmiField),
}

/// Kind of value carried by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// [`ChannelValue::Switch`].
    Switch,
    /// [`ChannelValue::Text`].
    Text,
    /// [`ChannelValue::Percent`].
    Percent,
}

impl ChannelKey {
    /// Every channel key, basic channels first.
    pub const ALL: [Self; 26] = {
        let mut all = [Self::Power; 26];
        all[1] = Self::Mode;
        all[2] = Self::Intensity;
        all[3] = Self::Brightness;
        all[4] = Self::Input;
        all[5] = Self::SyncStatus;
        let mut s = 0;
        while s < HdmiSlot::ALL.len() {
            let mut f = 0;
            while f < HdmiField::ALL.len() {
                all[6 + s * 4 + f] = Self::Hdmi(HdmiSlot::ALL[s], HdmiField::ALL[f]);
                f += 1;
            }
            s += 1;
        }
        all
    };

    /// Returns the kind of value this channel carries.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Power | Self::SyncStatus => ValueKind::Switch,
            Self::Brightness => ValueKind::Percent,
            _ => ValueKind::Text,
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power => f.write_str("power"),
            Self::Mode => f.write_str("mode"),
            Self::Intensity => f.write_str("intensity"),
            Self::Brightness => f.write_str("brightness"),
            Self::Input => f.write_str("input"),
            Self::SyncStatus => f.write_str("syncStatus"),
            Self::Hdmi(slot, field) => write!(f, "{}{}", slot.as_str(), field.suffix()),
        }
    }
}

impl FromStr for ChannelKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let basic = match s {
            "power" => Some(Self::Power),
            "mode" => Some(Self::Mode),
            "intensity" => Some(Self::Intensity),
            "brightness" => Some(Self::Brightness),
            "input" => Some(Self::Input),
            "syncStatus" => Some(Self::SyncStatus),
            _ => None,
        };
        if let Some(key) = basic {
            return Ok(key);
        }

        HdmiSlot::ALL
            .iter()
            .find_map(|slot| {
                let suffix = s.strip_prefix(slot.as_str())?;
                HdmiField::ALL
                    .iter()
                    .find(|field| field.suffix() == suffix)
                    .map(|field| Self::Hdmi(*slot, *field))
            })
            .ok_or_else(|| ParseError::UnknownChannel(s.to_string()))
    }
}

/// Typed value of a channel.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ChannelValue {
    /// On/off value.
    Switch(PowerState),
    /// Free text value.
    Text(String),
    /// Percentage value.
    Percent(Percent),
}

impl ChannelValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Switch(_) => ValueKind::Switch,
            Self::Text(_) => ValueKind::Text,
            Self::Percent(_) => ValueKind::Percent,
        }
    }

    /// Returns the switch state, if this is a switch value.
    #[must_use]
    pub fn as_switch(&self) -> Option<PowerState> {
        match self {
            Self::Switch(state) => Some(*state),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the percentage, if this is a percentage value.
    #[must_use]
    pub fn as_percent(&self) -> Option<Percent> {
        match self {
            Self::Percent(p) => Some(*p),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch(state) => write!(f, "{state}"),
            Self::Text(text) => f.write_str(text),
            Self::Percent(p) => write!(f, "{}", p.value()),
        }
    }
}
