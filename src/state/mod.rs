// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] is the plain set-if-changed record of every channel value.
//! [`DeviceStateModel`] wraps it for sharing between a connector and its
//! owner and reports each accepted change to an
//! [`EventSink`](crate::event::EventSink).
//!
//! # Examples
//!
//! ```
//! use huesync_lib::state::{ChannelKey, ChannelValue, DeviceState};
//! use huesync_lib::types::Percent;
//!
//! let mut state = DeviceState::new();
//! let changed = state.set_brightness(Percent::from_device_scale(150).unwrap());
//! assert!(changed);
//! assert_eq!(
//!     state.get(ChannelKey::Brightness),
//!     Some(ChannelValue::Percent(Percent::new(75).unwrap()))
//! );
//! ```

mod channel;
mod device_state;
mod model;
mod snapshot;

pub use channel::{ChannelKey, ChannelValue, HdmiField, HdmiSlot, ValueKind};
pub use device_state::{DeviceState, HdmiPortState};
pub use model::DeviceStateModel;
pub use snapshot::{HdmiPort, StatusSnapshot};
