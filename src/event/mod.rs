// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event plumbing.
//!
//! Two layers carry notifications:
//!
//! - [`EventSink`] is the synchronous observer a
//!   [`DeviceStateModel`](crate::state::DeviceStateModel) reports to. The
//!   supervisor implements it.
//! - [`EventBus`] broadcasts [`SupervisorEvent`]s from the supervisor to any
//!   number of async subscribers.

mod event_bus;
mod sink;
mod supervisor_event;

pub use event_bus::EventBus;
pub use sink::EventSink;
pub use supervisor_event::SupervisorEvent;
