// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection to a single sync box.
//!
//! A [`DeviceConnector`] probes the device, registers for an access token
//! when none is configured, then polls the full status document at the
//! configured interval and applies it to a
//! [`DeviceStateModel`](crate::state::DeviceStateModel). A failed poll
//! reports one connection error and ends the connector; reconnecting is the
//! owner's job.

mod config;
mod device_connector;
mod phase;

pub use config::ConnectorConfig;
pub use device_connector::{DeviceConnector, DeviceConnectorBuilder, PAIRING_PROMPT};
pub use phase::ConnectionPhase;
