// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

/// Connection parameters for one connector instance.
///
/// The access token is empty until pairing completes; the connector
/// updates its own copy when a registration succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    host: String,
    access_token: String,
    polling_interval: Duration,
}

impl ConnectorConfig {
    /// Default polling interval.
    pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(60);

    /// Creates a configuration for `host` without a token.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            access_token: String::new(),
            polling_interval: Self::DEFAULT_POLLING_INTERVAL,
        }
    }

    /// Sets the access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    /// Sets the polling interval.
    #[must_use]
    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the access token, empty if none is known.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns `true` if a non-blank token is set.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// Returns the polling interval.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    pub(crate) fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = token.into();
    }
}
