// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairing and polling driver for one sync box.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use reqwest::StatusCode;
use tokio::task::JoinHandle;

use crate::command::ExecCommand;
use crate::error::{Error, PollError};
use crate::protocol::{ApiClient, ApiClientBuilder, RegistrationOutcome};
use crate::state::DeviceStateModel;

use super::{ConnectionPhase, ConnectorConfig};

/// Message forwarded to the sink while the device waits for its button.
pub const PAIRING_PROMPT: &str =
    "Press the pairing button on the sync box for 3 seconds until the LED blinks green";

/// Connects to one sync box, pairs if needed, and keeps its state polled.
///
/// A connector runs at most one background driver task. The driver loops
/// over the current [`ConnectionPhase`] with fixed-delay sleeps, so two
/// ticks never overlap. Once disposed or disconnected, a connector is not
/// reused.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use huesync_lib::connector::{ConnectorConfig, DeviceConnector};
/// use huesync_lib::event::EventSink;
/// use huesync_lib::state::{ChannelKey, ChannelValue, DeviceStateModel};
///
/// struct Log;
///
/// impl EventSink for Log {
///     fn state_changed(&self, channel: ChannelKey, value: &ChannelValue) {
///         println!("{channel} = {value}");
///     }
///     fn connection_error(&self, message: &str) {
///         eprintln!("{message}");
///     }
/// }
///
/// # async fn example() -> huesync_lib::Result<()> {
/// let model = Arc::new(DeviceStateModel::new(Arc::new(Log)));
/// let config = ConnectorConfig::new("192.168.1.50").with_access_token("secret");
/// let connector = DeviceConnector::new(config, model)?;
/// connector.connect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceConnector {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: ApiClient,
    model: Arc<DeviceStateModel>,
    config: RwLock<ConnectorConfig>,
    phase: RwLock<ConnectionPhase>,
    // Guards every write into the model; false once disposed.
    active: Mutex<bool>,
    // Serializes polling ticks with out-of-band refreshes.
    poll_lock: tokio::sync::Mutex<()>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    instance_id: String,
    pairing_interval: Duration,
}

impl DeviceConnector {
    /// Delay between registration attempts.
    pub const DEFAULT_PAIRING_INTERVAL: Duration = Duration::from_secs(3);

    /// Creates a connector with default timings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Reachability` if the host is not a usable address.
    pub fn new(config: ConnectorConfig, model: Arc<DeviceStateModel>) -> Result<Self, Error> {
        Self::builder(config, model).build()
    }

    /// Starts a builder for custom timings.
    #[must_use]
    pub fn builder(config: ConnectorConfig, model: Arc<DeviceStateModel>) -> DeviceConnectorBuilder {
        DeviceConnectorBuilder {
            config,
            model,
            pairing_interval: Self::DEFAULT_PAIRING_INTERVAL,
            request_timeout: ApiClient::DEFAULT_REQUEST_TIMEOUT,
            pairing_timeout: ApiClient::DEFAULT_PAIRING_TIMEOUT,
            instance_id: None,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> ConnectionPhase {
        *self.inner.phase.read()
    }

    /// Returns the access token currently in use, empty before pairing.
    #[must_use]
    pub fn access_token(&self) -> String {
        self.inner.config.read().access_token().to_string()
    }

    /// Returns the identifier sent as the registration instance name.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        &self.inner.instance_id
    }

    /// Returns the state model this connector writes into.
    #[must_use]
    pub fn model(&self) -> &Arc<DeviceStateModel> {
        &self.inner.model
    }

    /// Probes the device and starts pairing or polling.
    ///
    /// A failed probe is also reported as a connection error through the
    /// state model; the phase stays `Unconfigured`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Reachability` if the probe fails.
    pub async fn connect(&self) -> Result<(), Error> {
        if self.phase() != ConnectionPhase::Unconfigured {
            tracing::debug!(phase = %self.phase(), "Connect ignored");
            return Ok(());
        }

        if let Err(e) = self.inner.api.device_info().await {
            let error = Error::Reachability(e);
            if self.inner.is_active() {
                tracing::debug!(error = %error, "Reachability probe failed");
                self.inner.model.report_connection_error(&error.to_string());
            }
            return Err(error);
        }

        let next = if self.inner.config.read().has_access_token() {
            ConnectionPhase::Polling
        } else {
            ConnectionPhase::Pairing
        };
        self.inner.start(next);
        Ok(())
    }

    /// Sends an execution patch, then refreshes the state.
    ///
    /// The request runs in the background; its status is only logged.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` outside the polling phase, or the
    /// refresh's poll error.
    pub async fn send_command(&self, command: ExecCommand) -> Result<(), Error> {
        if !self.phase().is_polling() {
            return Err(Error::NotConnected);
        }

        let token = self.access_token();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.api.execute(&token, &command).await {
                Ok(status) if status == StatusCode::OK => {
                    tracing::debug!(command = %command.to_json(), "Command accepted");
                }
                Ok(status) => {
                    tracing::warn!(
                        command = %command.to_json(),
                        status = status.as_u16(),
                        "Command not accepted by device"
                    );
                }
                Err(e) => {
                    let error = Error::CommandSend(e);
                    tracing::warn!(command = %command.to_json(), error = %error, "Command failed");
                }
            }
        });

        self.refresh().await
    }

    /// Polls the device once, outside the regular interval.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` outside the polling phase. A poll
    /// failure disconnects the connector and is returned as `Error::Poll`.
    pub async fn refresh(&self) -> Result<(), Error> {
        if !self.phase().is_polling() {
            return Err(Error::NotConnected);
        }
        self.inner.poll().await.map_err(Error::from)
    }

    /// Stops the driver. No state is written afterwards.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl Drop for DeviceConnector {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

impl Inner {
    fn is_active(&self) -> bool {
        *self.active.lock()
    }

    fn polling_interval(&self) -> Duration {
        self.config.read().polling_interval()
    }

    fn dispose(&self) {
        // Waits for any state write in progress.
        *self.active.lock() = false;
        if let Some(ticker) = self.ticker.lock().take() {
            ticker.abort();
        }
        *self.phase.write() = ConnectionPhase::Disconnected;
    }

    fn start(self: &Arc<Self>, phase: ConnectionPhase) {
        let mut ticker = self.ticker.lock();
        if let Some(previous) = ticker.take() {
            previous.abort();
        }
        {
            let active = self.active.lock();
            if !*active {
                return;
            }
            *self.phase.write() = phase;
        }
        tracing::debug!(phase = %phase, "Starting driver");
        *ticker = Some(tokio::spawn(drive(Arc::clone(self))));
    }

    /// One registration attempt. Returns `true` once pairing succeeded.
    async fn pair(&self) -> bool {
        let response = match self.api.register(&self.instance_id).await {
            Ok(response) => response,
            Err(e) => {
                let error = Error::Pairing(e);
                tracing::debug!(error = %error, "Registration attempt failed");
                return false;
            }
        };

        match response.outcome() {
            RegistrationOutcome::Granted(token) => {
                let accepted = {
                    let active = self.active.lock();
                    if *active {
                        self.config.write().set_access_token(token.as_str());
                        *self.phase.write() = ConnectionPhase::Polling;
                    }
                    *active
                };
                // The sink may persist the token, so it runs outside the lock.
                if accepted {
                    tracing::info!(instance = %self.instance_id, "Pairing succeeded");
                    self.model.report_access_token(&token);
                }
                accepted
            }
            RegistrationOutcome::AwaitingButton => {
                tracing::info!("{PAIRING_PROMPT}");
                if self.is_active() {
                    self.model.report_pairing_prompt(PAIRING_PROMPT);
                }
                false
            }
            RegistrationOutcome::Refused(code) => {
                tracing::debug!(code, message = ?response.message, "Registration refused");
                false
            }
            RegistrationOutcome::Unrecognized => {
                tracing::debug!("Registration response carried neither token nor code");
                false
            }
        }
    }

    async fn poll(&self) -> Result<(), PollError> {
        let _tick = self.poll_lock.lock().await;
        if !self.is_active() {
            return Ok(());
        }

        let token = self.config.read().access_token().to_string();
        match self.api.status(&token).await {
            Ok(snapshot) => {
                let active = self.active.lock();
                if *active {
                    self.model.apply_snapshot(&snapshot);
                }
                Ok(())
            }
            Err(e) => {
                self.disconnect(&e);
                Err(e)
            }
        }
    }

    /// Stops polling and reports `error` once.
    fn disconnect(&self, error: &PollError) {
        {
            let active = self.active.lock();
            let mut phase = self.phase.write();
            if !*active || *phase != ConnectionPhase::Polling {
                return;
            }
            *phase = ConnectionPhase::Disconnected;
        }
        if let Some(ticker) = self.ticker.lock().take() {
            ticker.abort();
        }

        let message = error.to_string();
        tracing::warn!(error = %message, "Polling stopped");
        self.model.report_connection_error(&message);
    }
}

async fn drive(inner: Arc<Inner>) {
    loop {
        let phase = *inner.phase.read();
        let delay = match phase {
            ConnectionPhase::Pairing => {
                if inner.pair().await {
                    // First poll right after pairing
                    continue;
                }
                inner.pairing_interval
            }
            ConnectionPhase::Polling => {
                if inner.poll().await.is_err() {
                    return;
                }
                inner.polling_interval()
            }
            ConnectionPhase::Unconfigured | ConnectionPhase::Disconnected => return,
        };
        tokio::time::sleep(delay).await;
    }
}

/// Builder for a [`DeviceConnector`] with custom timings.
#[derive(Debug)]
pub struct DeviceConnectorBuilder {
    config: ConnectorConfig,
    model: Arc<DeviceStateModel>,
    pairing_interval: Duration,
    request_timeout: Duration,
    pairing_timeout: Duration,
    instance_id: Option<String>,
}

impl DeviceConnectorBuilder {
    /// Sets the delay between registration attempts.
    #[must_use]
    pub fn pairing_interval(mut self, interval: Duration) -> Self {
        self.pairing_interval = interval;
        self
    }

    /// Sets the timeout for probe, status and command requests.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the timeout for registration requests.
    #[must_use]
    pub fn pairing_timeout(mut self, timeout: Duration) -> Self {
        self.pairing_timeout = timeout;
        self
    }

    /// Sets the registration instance identifier. Defaults to a random UUID.
    #[must_use]
    pub fn instance_id(mut self, id: impl Into<String>) -> Self {
        self.instance_id = Some(id.into());
        self
    }

    /// Builds the connector in the `Unconfigured` phase.
    ///
    /// # Errors
    ///
    /// Returns `Error::Reachability` if the host is not a usable address.
    pub fn build(self) -> Result<DeviceConnector, Error> {
        let api = ApiClientBuilder::new()
            .host(self.config.host())
            .request_timeout(self.request_timeout)
            .pairing_timeout(self.pairing_timeout)
            .build()
            .map_err(Error::Reachability)?;

        let instance_id = self
            .instance_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(DeviceConnector {
            inner: Arc::new(Inner {
                api,
                model: self.model,
                config: RwLock::new(self.config),
                phase: RwLock::new(ConnectionPhase::Unconfigured),
                active: Mutex::new(true),
                poll_lock: tokio::sync::Mutex::new(()),
                ticker: Mutex::new(None),
                instance_id,
                pairing_interval: self.pairing_interval,
            }),
        })
    }
}
