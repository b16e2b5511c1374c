// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted sync box configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::connector::ConnectorConfig;
use crate::error::ConfigError;

/// Configuration of one sync box as stored by the consumer.
///
/// Field names serialize as `host`, `httpPollingInterval` and
/// `apiAccessToken`.
///
/// # Examples
///
/// ```
/// use huesync_lib::config::SyncBoxConfig;
///
/// let config = SyncBoxConfig::new("huesyncbox-c4299605aab2")
///     .with_polling_interval(10);
/// assert!(config.validate().is_ok());
/// assert!(!config.has_access_token());
///
/// let too_fast = SyncBoxConfig::new("192.168.1.20").with_polling_interval(2);
/// assert!(too_fast.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBoxConfig {
    /// Hostname or IP address of the sync box.
    pub host: String,
    /// Polling interval in seconds.
    #[serde(default = "SyncBoxConfig::default_polling_interval")]
    pub http_polling_interval: u64,
    /// Bearer token obtained by pairing. Empty until pairing completes.
    #[serde(default)]
    pub api_access_token: String,
}

impl SyncBoxConfig {
    /// Default polling interval in seconds.
    pub const DEFAULT_POLLING_INTERVAL: u64 = 60;

    /// Smallest accepted polling interval in seconds.
    pub const MIN_POLLING_INTERVAL: u64 = 5;

    const fn default_polling_interval() -> u64 {
        Self::DEFAULT_POLLING_INTERVAL
    }

    /// Creates a configuration for `host` with default interval and no token.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            http_polling_interval: Self::DEFAULT_POLLING_INTERVAL,
            api_access_token: String::new(),
        }
    }

    /// Sets the polling interval in seconds.
    #[must_use]
    pub fn with_polling_interval(mut self, seconds: u64) -> Self {
        self.http_polling_interval = seconds;
        self
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.api_access_token = token.into();
        self
    }

    /// Returns `true` if a non-blank access token is configured.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        !self.api_access_token.trim().is_empty()
    }

    /// Returns the polling interval.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.http_polling_interval)
    }

    /// Checks the configuration before a connector is created.
    ///
    /// A missing token is not an error: pairing obtains one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingHost` for a blank host and
    /// `ConfigError::PollingIntervalTooLow` for intervals below 5 seconds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http_polling_interval < Self::MIN_POLLING_INTERVAL {
            return Err(ConfigError::PollingIntervalTooLow {
                min: Self::MIN_POLLING_INTERVAL,
                actual: self.http_polling_interval,
            });
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        Ok(())
    }

    /// Builds the connector configuration.
    #[must_use]
    pub fn to_connector_config(&self) -> ConnectorConfig {
        ConnectorConfig::new(self.host.trim())
            .with_access_token(self.api_access_token.trim())
            .with_polling_interval(self.polling_interval())
    }
}
