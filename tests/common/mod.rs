// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use huesync_lib::event::EventSink;
use huesync_lib::state::{ChannelKey, ChannelValue};
use parking_lot::Mutex;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

pub fn port(name: &str, kind: &str, status: &str) -> Value {
    json!({"name": name, "type": kind, "status": status, "lastSyncMode": "video"})
}

/// Status document as sent by a sync box playing video from input 1.
pub fn status_document() -> Value {
    json!({
        "device": {"name": "Living Room", "deviceType": "HSB1"},
        "execution": {
            "mode": "video",
            "syncActive": false,
            "hdmiActive": true,
            "hdmiSource": "input1",
            "brightness": 100,
            "lastSyncMode": "video",
            "video": {"intensity": "high", "backgroundLighting": false},
            "game": {"intensity": "intense", "backgroundLighting": false},
            "music": {"intensity": "subtle", "palette": "neutral"}
        },
        "hdmi": {
            "input1": port("PC", "computer", "plugged"),
            "input2": port("HDMI 2", "generic", "unplugged"),
            "input3": port("Console", "game", "plugged"),
            "input4": port("HDMI 4", "generic", "unplugged"),
            "output": port("TV", "video", "plugged"),
            "contentSpecs": "1920 x 1080 @ 60000 - SDR",
            "videoSyncSupported": true,
            "audioSyncSupported": true
        }
    })
}

pub async fn mount_device_info(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Living Room",
            "deviceType": "HSB1",
            "uniqueId": "C4299605AAB2",
            "apiLevel": 7
        })))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_execution(server: &MockServer, status: u16) {
    Mock::given(method("PUT"))
        .and(path("/api/v1/execution"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Number of requests the server received for `verb` on `route`.
pub async fn request_count(server: &MockServer, verb: &str, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == route)
        .count()
}

/// Polls `check` for up to two seconds.
pub async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

/// Sink that records every notification.
#[derive(Default)]
pub struct Recorder {
    pub changes: Mutex<Vec<(ChannelKey, ChannelValue)>>,
    pub errors: Mutex<Vec<String>>,
    pub tokens: Mutex<Vec<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn change_count(&self) -> usize {
        self.changes.lock().len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().len()
    }
}

impl EventSink for Recorder {
    fn state_changed(&self, channel: ChannelKey, value: &ChannelValue) {
        self.changes.lock().push((channel, value.clone()));
    }

    fn connection_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn access_token_acquired(&self, token: &str) {
        self.tokens.lock().push(token.to_string());
    }

    fn pairing_prompt(&self, message: &str) {
        self.prompts.lock().push(message.to_string());
    }
}
