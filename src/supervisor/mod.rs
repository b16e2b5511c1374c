// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connector lifecycle for one configured sync box.
//!
//! The [`ConnectionSupervisor`] validates a [`SyncBoxConfig`](crate::config::SyncBoxConfig),
//! owns the live [`DeviceConnector`](crate::connector::DeviceConnector),
//! recreates it after a fixed delay when the connection is lost, and
//! publishes [`SupervisorEvent`](crate::event::SupervisorEvent)s to
//! subscribers.

mod connection_supervisor;
mod status;

pub use connection_supervisor::{ConnectionSupervisor, MISSING_TOKEN_MESSAGE, SupervisorBuilder};
pub use status::{StatusDetail, ThingStatus};
