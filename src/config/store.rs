// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration stores.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::ConfigError;

use super::SyncBoxConfig;

/// Where the supervisor writes back a newly acquired access token.
pub trait ConfigStore: Send + Sync {
    /// Persists `token` as the configuration's access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token could not be persisted.
    fn save_access_token(&self, token: &str) -> Result<(), ConfigError>;
}

/// Keeps the configuration in memory.
///
/// # Examples
///
/// ```
/// use huesync_lib::config::{ConfigStore, MemoryConfigStore, SyncBoxConfig};
///
/// let store = MemoryConfigStore::new(SyncBoxConfig::new("box"));
/// store.save_access_token("secret").unwrap();
/// assert_eq!(store.config().api_access_token, "secret");
/// ```
#[derive(Debug)]
pub struct MemoryConfigStore {
    config: Mutex<SyncBoxConfig>,
    writes: Mutex<usize>,
}

impl MemoryConfigStore {
    /// Creates a store holding `config`.
    #[must_use]
    pub fn new(config: SyncBoxConfig) -> Self {
        Self {
            config: Mutex::new(config),
            writes: Mutex::new(0),
        }
    }

    /// Returns a copy of the stored configuration.
    #[must_use]
    pub fn config(&self) -> SyncBoxConfig {
        self.config.lock().clone()
    }

    /// Returns how many times a token was saved.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn save_access_token(&self, token: &str) -> Result<(), ConfigError> {
        self.config.lock().api_access_token = token.to_string();
        *self.writes.lock() += 1;
        Ok(())
    }
}

/// Stores the configuration as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<SyncBoxConfig, ConfigError> {
        let contents = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves the configuration, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, config: &SyncBoxConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, contents)?;
        tracing::debug!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }
}

impl ConfigStore for JsonFileConfigStore {
    fn save_access_token(&self, token: &str) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        config.api_access_token = token.to_string();
        self.save(&config)
    }
}
