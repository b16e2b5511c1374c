// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire payloads of the sync box API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::state::{HdmiPort, StatusSnapshot};
use crate::types::{Percent, PowerState};

/// Response code the device sends while waiting for its pairing button.
pub const CODE_PAIRING_BUTTON: i64 = 16;

/// Body of `POST /registrations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Fixed application name.
    pub app_name: String,
    /// Instance name, `huesync-<instance-id>`.
    pub instance_name: String,
}

impl RegistrationRequest {
    /// Application name sent with every registration.
    pub const APP_NAME: &'static str = "huesync_lib";

    /// Creates the registration body for an instance identifier.
    #[must_use]
    pub fn new(instance_id: &str) -> Self {
        Self {
            app_name: Self::APP_NAME.to_string(),
            instance_name: format!("huesync-{instance_id}"),
        }
    }
}

/// Body returned by `POST /registrations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    /// Bearer token, present once the pairing button was pressed.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Device status code while pairing is pending or refused.
    #[serde(default)]
    pub code: Option<i64>,
    /// Human readable description of `code`.
    #[serde(default)]
    pub message: Option<String>,
}

/// What a registration response means for the pairing flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Pairing succeeded.
    Granted(String),
    /// The user has to press the pairing button.
    AwaitingButton,
    /// The device answered with some other code.
    Refused(i64),
    /// Neither a token nor a code was present.
    Unrecognized,
}

impl RegistrationResponse {
    /// Classifies the response. A token takes precedence over a code.
    #[must_use]
    pub fn outcome(&self) -> RegistrationOutcome {
        match (&self.access_token, self.code) {
            (Some(token), _) => RegistrationOutcome::Granted(token.clone()),
            (None, Some(CODE_PAIRING_BUTTON)) => RegistrationOutcome::AwaitingButton,
            (None, Some(code)) => RegistrationOutcome::Refused(code),
            (None, None) => RegistrationOutcome::Unrecognized,
        }
    }
}

/// Full status document returned by `GET /`.
///
/// Only the fields that map onto channels are decoded; a missing or
/// mistyped field fails the whole document.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusDocument {
    /// Execution state.
    pub execution: Execution,
    /// HDMI port state.
    pub hdmi: Hdmi,
}

/// The `execution` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    /// Current sync mode.
    pub mode: String,
    /// HDMI processing on/off.
    pub hdmi_active: bool,
    /// Selected source.
    pub hdmi_source: String,
    /// Light sync on/off.
    pub sync_active: bool,
    /// Brightness on the device scale (0-200).
    pub brightness: i64,
    /// Everything else, including the per-mode settings objects.
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

impl Execution {
    /// Returns the intensity configured for the current mode.
    ///
    /// `Ok(None)` when the device has no settings object for the mode.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings object exists but carries no
    /// string `intensity`.
    pub fn current_intensity(&self) -> Result<Option<&str>, ParseError> {
        let Some(settings) = self.other.get(&self.mode) else {
            return Ok(None);
        };
        settings
            .get("intensity")
            .and_then(serde_json::Value::as_str)
            .map(Some)
            .ok_or_else(|| ParseError::MissingField(format!("execution.{}.intensity", self.mode)))
    }
}

/// The `hdmi` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Hdmi {
    /// Input 1.
    pub input1: HdmiPortDocument,
    /// Input 2.
    pub input2: HdmiPortDocument,
    /// Input 3.
    pub input3: HdmiPortDocument,
    /// Input 4.
    pub input4: HdmiPortDocument,
    /// Output.
    pub output: HdmiPortDocument,
}

/// One port object under `hdmi`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HdmiPortDocument {
    /// Port name.
    pub name: String,
    /// Connected device type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Connection status.
    pub status: String,
    /// Last sync mode.
    pub last_sync_mode: String,
}

impl From<HdmiPortDocument> for HdmiPort {
    fn from(doc: HdmiPortDocument) -> Self {
        Self {
            name: doc.name,
            kind: doc.kind,
            status: doc.status,
            last_sync_mode: doc.last_sync_mode,
        }
    }
}

impl TryFrom<StatusDocument> for StatusSnapshot {
    type Error = ParseError;

    fn try_from(doc: StatusDocument) -> Result<Self, Self::Error> {
        let intensity = doc.execution.current_intensity()?.map(str::to_string);
        let brightness = Percent::from_device_scale(doc.execution.brightness).map_err(|e| {
            ParseError::InvalidValue {
                field: "execution.brightness".to_string(),
                message: e.to_string(),
            }
        })?;

        let Execution {
            mode,
            hdmi_active,
            hdmi_source,
            sync_active,
            ..
        } = doc.execution;
        let Hdmi {
            input1,
            input2,
            input3,
            input4,
            output,
        } = doc.hdmi;

        Ok(Self {
            mode,
            intensity,
            power: PowerState::from(hdmi_active),
            input: hdmi_source,
            sync_status: PowerState::from(sync_active),
            brightness,
            hdmi: [
                input1.into(),
                input2.into(),
                input3.into(),
                input4.into(),
                output.into(),
            ],
        })
    }
}

/// Decodes a status body into a snapshot.
///
/// # Errors
///
/// Returns an error on malformed JSON or any missing, mistyped or
/// out-of-range field.
pub fn parse_status(body: &str) -> Result<StatusSnapshot, ParseError> {
    let doc: StatusDocument = serde_json::from_str(body)?;
    doc.try_into()
}
