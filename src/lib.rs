// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `HueSync` Lib - A Rust library to connect to Philips Hue HDMI Sync Boxes.
//!
//! This library pairs with a sync box over its local HTTPS API, keeps the
//! device state polled, sends commands, and reconnects after connection
//! loss.
//!
//! # Supported Features
//!
//! - **Pairing**: registration until the device's button is pressed
//! - **Status polling**: power, mode, intensity, brightness, input, light
//!   sync and the four HDMI inputs plus output
//! - **Commands**: single-field execution patches followed by a refresh
//! - **Supervision**: online/offline status, fixed-delay reconnect and
//!   token persistence
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use huesync_lib::command::Command;
//! use huesync_lib::config::{JsonFileConfigStore, SyncBoxConfig};
//! use huesync_lib::state::ChannelKey;
//! use huesync_lib::supervisor::ConnectionSupervisor;
//! use huesync_lib::types::PowerState;
//!
//! #[tokio::main]
//! async fn main() -> huesync_lib::Result<()> {
//!     let store = JsonFileConfigStore::new("huesync.json");
//!     let config = store.load()?;
//!
//!     let supervisor = ConnectionSupervisor::new(Arc::new(store));
//!     supervisor.initialize(config).await?;
//!
//!     supervisor
//!         .handle_command(ChannelKey::Power, &Command::Switch(PowerState::On))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Lower Level
//!
//! A [`DeviceConnector`](connector::DeviceConnector) can be used without a
//! supervisor. It reports through an [`EventSink`](event::EventSink) and
//! leaves reconnecting to its owner.

pub mod command;
pub mod config;
pub mod connector;
pub mod discovery;
pub mod error;
pub mod event;
pub mod protocol;
pub mod state;
pub mod supervisor;
pub mod types;

pub use command::{Command, ExecCommand};
pub use config::{ConfigStore, JsonFileConfigStore, MemoryConfigStore, SyncBoxConfig};
pub use connector::{ConnectionPhase, ConnectorConfig, DeviceConnector};
pub use discovery::{DiscoveredDevice, DiscoveryAdapter, HueSyncServiceResolver};
pub use error::{ConfigError, Error, ParseError, PollError, ProtocolError, Result, ValueError};
pub use event::{EventBus, EventSink, SupervisorEvent};
pub use state::{ChannelKey, ChannelValue, DeviceState, DeviceStateModel};
pub use supervisor::{ConnectionSupervisor, StatusDetail, ThingStatus};
pub use types::{Percent, PowerState};
