// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Percentage type for the brightness channel.
//!
//! The sync box reports and accepts brightness on a 0-200 scale while
//! channels expose 0-100. [`Percent`] keeps the user-facing value and owns
//! both directions of the conversion.

use std::fmt;

use crate::error::ValueError;

/// An integer percentage (0-100).
///
/// # Examples
///
/// ```
/// use huesync_lib::types::Percent;
///
/// let half = Percent::from_device_scale(100).unwrap();
/// assert_eq!(half.value(), 50);
///
/// // Odd raw values are truncated
/// assert_eq!(Percent::from_device_scale(101).unwrap().value(), 50);
///
/// assert!(Percent::new(101).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Percent(u8);

impl Percent {
    /// 0%.
    pub const MIN: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(100);

    /// Upper bound of the device's native brightness scale.
    pub const DEVICE_SCALE_MAX: i64 = 200;

    /// Creates a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Converts a raw device brightness (0-200) by integer-halving it.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the raw value is negative or the
    /// halved value exceeds 100.
    pub fn from_device_scale(raw: i64) -> Result<Self, ValueError> {
        let out_of_range = || ValueError::OutOfRange {
            min: 0,
            max: Self::DEVICE_SCALE_MAX,
            actual: raw,
        };
        if raw < 0 {
            return Err(out_of_range());
        }
        let halved = u8::try_from(raw / 2).map_err(|_| out_of_range())?;
        Self::new(halved).map_err(|_| out_of_range())
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percent {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Converts a user-facing brightness into the device's 0-200 scale.
///
/// The input is truncated toward zero before doubling, so `50.9` becomes
/// `100` and not `102`.
///
/// # Errors
///
/// Returns `ValueError::InvalidNumber` if the value is not finite and
/// `ValueError::OutOfRange` if it truncates to a value outside 0-100.
///
/// # Examples
///
/// ```
/// use huesync_lib::types::brightness_to_device_scale;
///
/// assert_eq!(brightness_to_device_scale(50.0).unwrap(), 100);
/// assert_eq!(brightness_to_device_scale(50.9).unwrap(), 100);
/// assert!(brightness_to_device_scale(f64::NAN).is_err());
/// assert!(brightness_to_device_scale(101.0).is_err());
/// ```
pub fn brightness_to_device_scale(value: f64) -> Result<i64, ValueError> {
    if !value.is_finite() {
        return Err(ValueError::InvalidNumber(value.to_string()));
    }
    // Truncation toward zero is the device-facing contract.
    #[allow(clippy::cast_possible_truncation)]
    let truncated = value.trunc() as i64;
    if !(0..=100).contains(&truncated) {
        return Err(ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: truncated,
        });
    }
    Ok(truncated * 2)
}
