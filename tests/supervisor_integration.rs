// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the connection supervisor.

mod common;

use std::sync::Arc;
use std::time::Duration;

use huesync_lib::command::Command;
use huesync_lib::config::{MemoryConfigStore, SyncBoxConfig};
use huesync_lib::connector::ConnectionPhase;
use huesync_lib::event::SupervisorEvent;
use huesync_lib::state::{ChannelKey, ChannelValue, HdmiField, HdmiSlot};
use huesync_lib::supervisor::{ConnectionSupervisor, MISSING_TOKEN_MESSAGE, StatusDetail, ThingStatus};
use huesync_lib::types::{Percent, PowerState};
use serde_json::json;
use tokio::sync::broadcast;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    TOKEN, eventually, mount_device_info, mount_execution, mount_status, request_count,
    status_document,
};

fn supervisor(
    config: &SyncBoxConfig,
    reconnect: Duration,
) -> (Arc<MemoryConfigStore>, ConnectionSupervisor) {
    let store = Arc::new(MemoryConfigStore::new(config.clone()));
    let supervisor = ConnectionSupervisor::builder(store.clone())
        .reconnect_delay(reconnect)
        .pairing_interval(Duration::from_millis(50))
        .build();
    (store, supervisor)
}

fn drain(events: &mut broadcast::Receiver<SupervisorEvent>) -> Vec<SupervisorEvent> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}

fn statuses(events: &[SupervisorEvent]) -> Vec<ThingStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            SupervisorEvent::StatusChanged { status } => Some(status.clone()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Initialization
// ============================================================================

mod initialize {
    use super::*;

    #[tokio::test]
    async fn low_interval_creates_no_connector() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;

        let config = SyncBoxConfig::new(server.uri())
            .with_polling_interval(3)
            .with_access_token(TOKEN);
        let (_, supervisor) = supervisor(&config, Duration::from_millis(100));

        let err = supervisor.initialize(config).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: The polling interval should be at least 5 seconds!"
        );
        assert!(supervisor.phase().is_none());

        // No retry either
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
        assert!(matches!(
            supervisor.status(),
            ThingStatus::Offline {
                detail: StatusDetail::ConfigurationError,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn token_config_goes_online_with_first_state() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;
        mount_status(&server, status_document()).await;

        let config = SyncBoxConfig::new(server.uri()).with_access_token(TOKEN);
        let (store, supervisor) = supervisor(&config, Duration::from_secs(30));
        let mut events = supervisor.subscribe();

        supervisor.initialize(config).await.unwrap();
        assert!(eventually(|| supervisor.status().is_online()).await);
        assert_eq!(supervisor.phase(), Some(ConnectionPhase::Polling));

        // Wait for the whole first poll to be published
        let last = ChannelKey::Hdmi(HdmiSlot::Output, HdmiField::LastMode);
        assert!(eventually(|| supervisor.channel_state(last).is_some()).await);

        let received = drain(&mut events);
        // Status starts out unknown, so only going online is published
        assert_eq!(statuses(&received), vec![ThingStatus::Online]);
        assert_eq!(received.iter().filter(|e| e.is_state_change()).count(), 26);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn channel_state_replays_last_values() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;
        mount_status(&server, status_document()).await;

        let config = SyncBoxConfig::new(server.uri()).with_access_token(TOKEN);
        let (_, supervisor) = supervisor(&config, Duration::from_secs(30));
        supervisor.initialize(config).await.unwrap();

        assert!(eventually(|| supervisor.channel_state(ChannelKey::Brightness).is_some()).await);
        assert_eq!(
            supervisor.channel_state(ChannelKey::Brightness),
            Some(ChannelValue::Percent(Percent::new(50).unwrap()))
        );
        assert_eq!(
            supervisor.channel_state(ChannelKey::Power),
            Some(ChannelValue::Switch(PowerState::On))
        );
    }
}

// ============================================================================
// Pairing and token persistence
// ============================================================================

mod pairing {
    use super::*;

    #[tokio::test]
    async fn missing_token_pairs_and_persists_once() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/registrations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "registrationId": "7",
                "accessToken": TOKEN
            })))
            .mount(&server)
            .await;
        mount_status(&server, status_document()).await;

        let config = SyncBoxConfig::new(server.uri());
        let (store, supervisor) = supervisor(&config, Duration::from_secs(30));
        let mut events = supervisor.subscribe();

        supervisor.initialize(config).await.unwrap();
        assert!(eventually(|| supervisor.status().is_online()).await);

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.config().api_access_token, TOKEN);
        assert_eq!(
            supervisor.config().map(|c| c.api_access_token),
            Some(TOKEN.to_string())
        );

        let received = drain(&mut events);
        let tokens = received
            .iter()
            .filter(|e| matches!(e, SupervisorEvent::TokenChanged { .. }))
            .count();
        assert_eq!(tokens, 1);
        assert_eq!(
            statuses(&received),
            vec![
                ThingStatus::offline(StatusDetail::ConfigurationError, MISSING_TOKEN_MESSAGE),
                ThingStatus::Online,
            ]
        );
    }

    #[tokio::test]
    async fn button_prompt_is_published() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/registrations"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 16,
                "message": "Invalid State"
            })))
            .mount(&server)
            .await;

        let config = SyncBoxConfig::new(server.uri());
        let (store, supervisor) = supervisor(&config, Duration::from_secs(30));
        let mut events = supervisor.subscribe();

        supervisor.initialize(config).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let received = drain(&mut events);
        assert!(
            received
                .iter()
                .any(|e| matches!(e, SupervisorEvent::PairingRequired { .. }))
        );
        assert_eq!(supervisor.phase(), Some(ConnectionPhase::Pairing));
        assert_eq!(store.write_count(), 0);
        supervisor.dispose();
    }
}

// ============================================================================
// Reconnect
// ============================================================================

mod reconnect {
    use super::*;

    #[tokio::test]
    async fn unreachable_device_is_retried_after_the_delay() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/device"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = SyncBoxConfig::new(server.uri()).with_access_token(TOKEN);
        let (_, supervisor) = supervisor(&config, Duration::from_millis(400));

        supervisor.initialize(config).await.unwrap();
        assert!(matches!(
            supervisor.status(),
            ThingStatus::Offline {
                detail: StatusDetail::CommunicationError,
                ..
            }
        ));
        assert!(supervisor.phase().is_none());
        assert_eq!(request_count(&server, "GET", "/api/v1/device").await, 1);

        // Not sooner
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(request_count(&server, "GET", "/api/v1/device").await, 1);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(request_count(&server, "GET", "/api/v1/device").await, 2);
        supervisor.dispose();
    }

    #[tokio::test]
    async fn poll_failure_reconnects_and_recovers() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v1"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        mount_status(&server, status_document()).await;

        let config = SyncBoxConfig::new(server.uri()).with_access_token(TOKEN);
        let (_, supervisor) = supervisor(&config, Duration::from_millis(200));
        let mut events = supervisor.subscribe();

        supervisor.initialize(config).await.unwrap();
        assert!(eventually(|| supervisor.status().is_offline()).await);
        assert!(eventually(|| supervisor.status().is_online()).await);

        let received = statuses(&drain(&mut events));
        assert_eq!(
            received,
            vec![
                ThingStatus::offline(
                    StatusDetail::CommunicationError,
                    "API Error: HTTP 500 - Internal Server Error"
                ),
                ThingStatus::Online,
            ]
        );
        assert_eq!(request_count(&server, "GET", "/api/v1/device").await, 2);
    }

    #[tokio::test]
    async fn dispose_cancels_pending_reconnect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/device"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = SyncBoxConfig::new(server.uri()).with_access_token(TOKEN);
        let (_, supervisor) = supervisor(&config, Duration::from_millis(100));
        supervisor.initialize(config).await.unwrap();
        supervisor.dispose();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(request_count(&server, "GET", "/api/v1/device").await, 1);
    }
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    async fn brightness_command_puts_doubled_value() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;
        mount_status(&server, status_document()).await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/execution"))
            .and(body_json(json!({"brightness": 64})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = SyncBoxConfig::new(server.uri()).with_access_token(TOKEN);
        let (_, supervisor) = supervisor(&config, Duration::from_secs(30));
        supervisor.initialize(config).await.unwrap();
        assert!(eventually(|| supervisor.status().is_online()).await);

        supervisor
            .handle_command(ChannelKey::Brightness, &Command::Number(32.7))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(request_count(&server, "PUT", "/api/v1/execution").await, 1);
    }

    #[tokio::test]
    async fn refresh_and_unsupported_commands_send_nothing() {
        let server = MockServer::start().await;
        mount_device_info(&server).await;
        mount_status(&server, status_document()).await;
        mount_execution(&server, 200).await;

        let config = SyncBoxConfig::new(server.uri()).with_access_token(TOKEN);
        let (_, supervisor) = supervisor(&config, Duration::from_secs(30));
        supervisor.initialize(config).await.unwrap();
        assert!(eventually(|| supervisor.status().is_online()).await);

        supervisor
            .handle_command(ChannelKey::Mode, &Command::Refresh)
            .await
            .unwrap();
        let unsupported = supervisor
            .handle_command(
                ChannelKey::Hdmi(HdmiSlot::Input2, HdmiField::Name),
                &Command::Text("Console".into()),
            )
            .await;
        assert!(unsupported.is_err_and(|e| e.is_recoverable()));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(request_count(&server, "PUT", "/api/v1/execution").await, 0);
        assert_eq!(supervisor.phase(), Some(ConnectionPhase::Polling));
    }
}
