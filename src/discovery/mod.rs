// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapping of mDNS service names to sync box configurations.
//!
//! The crate does not browse the network itself. Whatever mDNS browser the
//! consumer runs hands qualified service names to a [`DiscoveryAdapter`],
//! which turns matching names into a [`DiscoveredDevice`].
//!
//! # Examples
//!
//! ```
//! use huesync_lib::discovery::{DiscoveryAdapter, HueSyncServiceResolver};
//!
//! let resolver = HueSyncServiceResolver;
//! let device = resolver
//!     .resolve("HueSyncBox-C4299605AAB2._huesync._tcp.local.")
//!     .unwrap();
//!
//! assert_eq!(device.host, "huesyncbox-c4299605aab2");
//! assert_eq!(device.serial, "C4299605AAB2");
//!
//! let config = device.into_config();
//! assert!(!config.has_access_token());
//! ```

use crate::config::SyncBoxConfig;

/// Turns discovered service names into devices.
pub trait DiscoveryAdapter: Send + Sync {
    /// The mDNS service type this adapter handles.
    fn service_type(&self) -> &str;

    /// Resolves a fully qualified service instance name.
    ///
    /// Returns `None` for names that do not belong to a supported device.
    fn resolve(&self, qualified_name: &str) -> Option<DiscoveredDevice>;
}

/// A sync box found on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Hostname to connect to.
    pub host: String,
    /// Serial number as advertised.
    pub serial: String,
    /// Stable lowercase identifier for the device.
    pub thing_id: String,
    /// Vendor name.
    pub vendor: &'static str,
    /// Model name.
    pub model: &'static str,
    /// Human readable label.
    pub label: &'static str,
}

impl DiscoveredDevice {
    /// Builds a configuration with the default interval and no token.
    #[must_use]
    pub fn into_config(self) -> SyncBoxConfig {
        SyncBoxConfig::new(self.host)
    }
}

/// Resolver for `_huesync._tcp.local.` service names.
#[derive(Debug, Clone, Copy, Default)]
pub struct HueSyncServiceResolver;

impl HueSyncServiceResolver {
    /// Advertised service type.
    pub const SERVICE_TYPE: &'static str = "_huesync._tcp.local.";
    /// Vendor reported for discovered devices.
    pub const VENDOR: &'static str = "Philips";
    /// Model reported for discovered devices.
    pub const MODEL: &'static str = "Hue Play HDMI Sync Box";
    /// Label reported for discovered devices.
    pub const LABEL: &'static str = "Philips Hue HDMI Sync Box";
}

impl DiscoveryAdapter for HueSyncServiceResolver {
    fn service_type(&self) -> &str {
        Self::SERVICE_TYPE
    }

    fn resolve(&self, qualified_name: &str) -> Option<DiscoveredDevice> {
        let instance = qualified_name.strip_suffix(Self::SERVICE_TYPE)?.strip_suffix('.')?;
        let (name, serial) = instance.rsplit_once('-')?;
        if name.is_empty() || serial.is_empty() {
            tracing::debug!(qualified_name, "Ignoring service without serial");
            return None;
        }

        let host = instance.to_lowercase();
        tracing::debug!(qualified_name, host = %host, serial, "Resolved sync box");
        Some(DiscoveredDevice {
            thing_id: host.clone(),
            host,
            serial: serial.to_string(),
            vendor: Self::VENDOR,
            model: Self::MODEL,
            label: Self::LABEL,
        })
    }
}
