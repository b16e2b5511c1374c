// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off switch state.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the state of a switch channel (`power`, `syncStatus`).
///
/// # Examples
///
/// ```
/// use huesync_lib::types::PowerState;
///
/// assert_eq!(PowerState::from(true), PowerState::On);
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// assert!(PowerState::On.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PowerState {
    /// Switched off.
    Off,
    /// Switched on.
    On,
}

impl PowerState {
    /// Returns the display representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns `true` for [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(value: PowerState) -> Self {
        value.is_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("ON".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("true".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("0".parse::<PowerState>().unwrap(), PowerState::Off);
        assert!("toggle".parse::<PowerState>().is_err());
    }

    #[test]
    fn bool_conversions() {
        assert!(bool::from(PowerState::On));
        assert!(!bool::from(PowerState::from(false)));
    }
}
