// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sync box configuration and where it is persisted.

mod store;
mod sync_box_config;

pub use store::{ConfigStore, JsonFileConfigStore, MemoryConfigStore};
pub use sync_box_config::SyncBoxConfig;
