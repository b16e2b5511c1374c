// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type-safe value types for sync box channels.
//!
//! - [`PowerState`] - On/off switch state
//! - [`Percent`] - Brightness level (0-100%)

mod percent;
mod power;

pub use percent::{Percent, brightness_to_device_scale};
pub use power::PowerState;
