// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::command::{Command, to_exec_command};
use crate::config::{ConfigStore, SyncBoxConfig};
use crate::connector::{ConnectionPhase, DeviceConnector};
use crate::error::Error;
use crate::event::{EventBus, EventSink, SupervisorEvent};
use crate::state::{ChannelKey, ChannelValue, DeviceStateModel};

use super::{StatusDetail, ThingStatus};

/// Status message while no access token is configured.
pub const MISSING_TOKEN_MESSAGE: &str =
    "API access token is not configured; waiting for pairing with the sync box";

/// Keeps one sync box connected.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use huesync_lib::config::{MemoryConfigStore, SyncBoxConfig};
/// use huesync_lib::event::SupervisorEvent;
/// use huesync_lib::supervisor::ConnectionSupervisor;
///
/// # async fn example() -> huesync_lib::Result<()> {
/// let config = SyncBoxConfig::new("192.168.1.50");
/// let store = Arc::new(MemoryConfigStore::new(config.clone()));
/// let supervisor = ConnectionSupervisor::new(store);
/// let mut events = supervisor.subscribe();
///
/// supervisor.initialize(config).await?;
///
/// while let Ok(event) = events.recv().await {
///     if let SupervisorEvent::StateChanged { channel, value } = event {
///         println!("{channel} = {value}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConnectionSupervisor {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn ConfigStore>,
    bus: EventBus,
    reconnect_delay: Duration,
    pairing_interval: Duration,
    request_timeout: Duration,
    pairing_timeout: Duration,
    state: Mutex<SupervisorState>,
}

#[derive(Default)]
struct SupervisorState {
    config: Option<SyncBoxConfig>,
    model: Option<Arc<DeviceStateModel>>,
    connector: Option<Arc<DeviceConnector>>,
    retry: Option<JoinHandle<()>>,
    status: ThingStatus,
    persisted_token: String,
    // Bumped on every initialize and dispose; stale sinks compare against it.
    generation: u64,
}

impl std::fmt::Debug for ConnectionSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ConnectionSupervisor")
            .field("status", &state.status)
            .field("connector", &state.connector)
            .field("reconnect_delay", &self.inner.reconnect_delay)
            .finish_non_exhaustive()
    }
}

impl ConnectionSupervisor {
    /// Delay before a lost connection is recreated.
    pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(30);

    /// Creates a supervisor writing tokens into `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self::builder(store).build()
    }

    /// Starts a builder for custom timings.
    #[must_use]
    pub fn builder(store: Arc<dyn ConfigStore>) -> SupervisorBuilder {
        SupervisorBuilder {
            store,
            reconnect_delay: Self::DEFAULT_RECONNECT_DELAY,
            pairing_interval: DeviceConnector::DEFAULT_PAIRING_INTERVAL,
            request_timeout: crate::protocol::ApiClient::DEFAULT_REQUEST_TIMEOUT,
            pairing_timeout: crate::protocol::ApiClient::DEFAULT_PAIRING_TIMEOUT,
        }
    }

    /// Validates `config` and connects.
    ///
    /// Any previous connector and pending reconnect are dropped first.
    /// Connection failures do not fail this call; they show up as an
    /// offline status and a scheduled reconnect.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid. No
    /// connector is created and no reconnect is scheduled.
    pub async fn initialize(&self, config: SyncBoxConfig) -> Result<(), Error> {
        let stale = self.inner.reset();
        stale.release();

        if let Err(e) = config.validate() {
            tracing::warn!(host = %config.host, error = %e, "Invalid configuration");
            self.inner
                .set_status(ThingStatus::offline(StatusDetail::ConfigurationError, e.to_string()));
            return Err(e.into());
        }

        let has_token = config.has_access_token();
        {
            let mut state = self.inner.state.lock();
            let sink = SupervisorSink {
                inner: Arc::downgrade(&self.inner),
                generation: state.generation,
            };
            state.model = Some(Arc::new(DeviceStateModel::new(Arc::new(sink))));
            state.persisted_token = config.api_access_token.trim().to_string();
            state.config = Some(config);
        }
        self.inner.set_status(ThingStatus::Unknown);

        if !has_token {
            tracing::warn!("{MISSING_TOKEN_MESSAGE}");
            self.inner.set_status(ThingStatus::offline(
                StatusDetail::ConfigurationError,
                MISSING_TOKEN_MESSAGE,
            ));
        }

        self.inner.create_connection().await;
        Ok(())
    }

    /// Dispatches a channel command to the device.
    ///
    /// `Refresh` is a no-op and commands are ignored while no connector
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCommand` if the channel does not accept
    /// the command, `Error::NotConnected` if the connector is not polling,
    /// or the follow-up refresh's poll error.
    pub async fn handle_command(&self, channel: ChannelKey, command: &Command) -> Result<(), Error> {
        let exec = match to_exec_command(channel, command) {
            Ok(Some(exec)) => exec,
            Ok(None) => return Ok(()),
            Err(e) => {
                tracing::warn!(%channel, %command, error = %e, "Rejected command");
                return Err(e);
            }
        };

        let connector = self.inner.state.lock().connector.clone();
        let Some(connector) = connector else {
            tracing::debug!(%channel, %command, "No connector, command ignored");
            return Ok(());
        };
        connector.send_command(exec).await
    }

    /// Disposes the connector and cancels any pending reconnect.
    pub fn dispose(&self) {
        let stale = self.inner.reset();
        stale.release();
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> ThingStatus {
        self.inner.state.lock().status.clone()
    }

    /// Returns the live connector's phase, `None` without a connector.
    #[must_use]
    pub fn phase(&self) -> Option<ConnectionPhase> {
        let connector = self.inner.state.lock().connector.clone();
        connector.map(|c| c.phase())
    }

    /// Returns the last known value of a channel.
    #[must_use]
    pub fn channel_state(&self, channel: ChannelKey) -> Option<ChannelValue> {
        let model = self.inner.state.lock().model.clone();
        model.and_then(|m| m.get(channel))
    }

    /// Returns the configuration in effect, including a token acquired by
    /// pairing.
    #[must_use]
    pub fn config(&self) -> Option<SyncBoxConfig> {
        self.inner.state.lock().config.clone()
    }

    /// Subscribes to supervisor events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.inner.bus.subscribe()
    }

    /// Returns the event bus.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.inner.bus
    }
}

impl Drop for ConnectionSupervisor {
    fn drop(&mut self) {
        self.inner.reset().release();
    }
}

/// Resources taken out of the supervisor lock, released after unlocking.
struct Stale {
    connector: Option<Arc<DeviceConnector>>,
    retry: Option<JoinHandle<()>>,
}

impl Stale {
    fn release(self) {
        if let Some(retry) = self.retry {
            retry.abort();
        }
        if let Some(connector) = self.connector {
            connector.dispose();
        }
    }
}

impl Inner {
    fn reset(&self) -> Stale {
        let mut state = self.state.lock();
        state.generation += 1;
        state.model = None;
        state.config = None;
        Stale {
            connector: state.connector.take(),
            retry: state.retry.take(),
        }
    }

    fn set_status(&self, status: ThingStatus) {
        {
            let mut state = self.state.lock();
            if state.status == status {
                return;
            }
            state.status = status.clone();
        }
        tracing::debug!(status = %status, "Status changed");
        self.bus.publish(SupervisorEvent::StatusChanged { status });
    }

    async fn create_connection(self: &Arc<Self>) {
        let (generation, previous, config, model) = {
            let mut state = self.state.lock();
            let (Some(config), Some(model)) = (state.config.clone(), state.model.clone()) else {
                return;
            };
            (state.generation, state.connector.take(), config, model)
        };
        if let Some(previous) = previous {
            previous.dispose();
        }

        let built = DeviceConnector::builder(config.to_connector_config(), model)
            .pairing_interval(self.pairing_interval)
            .request_timeout(self.request_timeout)
            .pairing_timeout(self.pairing_timeout)
            .build();
        let connector = match built {
            Ok(connector) => Arc::new(connector),
            Err(e) => {
                self.connection_lost(generation, &e.to_string());
                return;
            }
        };

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.connector = Some(Arc::clone(&connector));
        }

        tracing::debug!(host = %config.host, "Connecting");
        // Failures arrive through the sink as connection errors
        if let Err(e) = connector.connect().await {
            tracing::debug!(host = %config.host, error = %e, "Connect failed");
        }
    }

    fn connection_lost(self: &Arc<Self>, generation: u64, message: &str) {
        let previous = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            if let Some(retry) = state.retry.take() {
                retry.abort();
            }
            let weak = Arc::downgrade(self);
            let delay = self.reconnect_delay;
            state.retry = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(inner) = weak.upgrade() {
                    inner.reconnect(generation).await;
                }
            }));
            state.connector.take()
        };

        tracing::warn!(error = %message, delay = ?self.reconnect_delay, "Connection lost, reconnect scheduled");
        if !self.state.lock().status.is_offline() {
            self.set_status(ThingStatus::offline(StatusDetail::CommunicationError, message));
        }

        if let Some(previous) = previous {
            previous.dispose();
        }
    }

    async fn reconnect(self: &Arc<Self>, generation: u64) {
        {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            // This task is the pending retry
            state.retry.take();
        }
        tracing::debug!("Reconnecting");
        self.create_connection().await;
    }

    fn state_changed(&self, generation: u64, channel: ChannelKey, value: &ChannelValue) {
        let went_online = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            if state.status.is_online() {
                false
            } else {
                state.status = ThingStatus::Online;
                true
            }
        };

        if went_online {
            tracing::debug!(status = %ThingStatus::Online, "Status changed");
            self.bus.publish(SupervisorEvent::StatusChanged {
                status: ThingStatus::Online,
            });
        }
        self.bus.publish(SupervisorEvent::StateChanged {
            channel,
            value: value.clone(),
        });
    }

    fn token_acquired(&self, generation: u64, token: &str) {
        {
            let mut state = self.state.lock();
            if state.generation != generation || state.persisted_token == token {
                return;
            }
            state.persisted_token = token.to_string();
            if let Some(config) = state.config.as_mut() {
                config.api_access_token = token.to_string();
            }
        }

        match self.store.save_access_token(token) {
            Ok(()) => tracing::info!("Access token saved"),
            Err(e) => tracing::warn!(error = %e, "Failed to save access token"),
        }
        self.bus.publish(SupervisorEvent::TokenChanged {
            token: token.to_string(),
        });
    }

    fn pairing_prompt(&self, generation: u64, message: &str) {
        if self.state.lock().generation != generation {
            return;
        }
        self.bus.publish(SupervisorEvent::PairingRequired {
            message: message.to_string(),
        });
    }
}

/// Sink installed into each state model the supervisor creates.
struct SupervisorSink {
    inner: Weak<Inner>,
    generation: u64,
}

impl EventSink for SupervisorSink {
    fn state_changed(&self, channel: ChannelKey, value: &ChannelValue) {
        if let Some(inner) = self.inner.upgrade() {
            inner.state_changed(self.generation, channel, value);
        }
    }

    fn connection_error(&self, message: &str) {
        if let Some(inner) = self.inner.upgrade() {
            inner.connection_lost(self.generation, message);
        }
    }

    fn access_token_acquired(&self, token: &str) {
        if let Some(inner) = self.inner.upgrade() {
            inner.token_acquired(self.generation, token);
        }
    }

    fn pairing_prompt(&self, message: &str) {
        if let Some(inner) = self.inner.upgrade() {
            inner.pairing_prompt(self.generation, message);
        }
    }
}

/// Builder for a [`ConnectionSupervisor`] with custom timings.
pub struct SupervisorBuilder {
    store: Arc<dyn ConfigStore>,
    reconnect_delay: Duration,
    pairing_interval: Duration,
    request_timeout: Duration,
    pairing_timeout: Duration,
}

impl SupervisorBuilder {
    /// Sets the delay before a lost connection is recreated.
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

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

    /// Builds the supervisor.
    #[must_use]
    pub fn build(self) -> ConnectionSupervisor {
        ConnectionSupervisor {
            inner: Arc::new(Inner {
                store: self.store,
                bus: EventBus::new(),
                reconnect_delay: self.reconnect_delay,
                pairing_interval: self.pairing_interval,
                request_timeout: self.request_timeout,
                pairing_timeout: self.pairing_timeout,
                state: Mutex::new(SupervisorState::default()),
            }),
        }
    }
}
