// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Execution patches for `PUT /execution`.

use serde::Serialize;

/// A single-field JSON patch for the device's execution state.
///
/// Serializes externally tagged, so every variant becomes an object with
/// exactly one key:
///
/// ```
/// use huesync_lib::command::ExecCommand;
///
/// assert_eq!(ExecCommand::HdmiActive(true).to_json(), r#"{"hdmiActive":true}"#);
/// assert_eq!(ExecCommand::Mode("video".into()).to_json(), r#"{"mode":"video"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecCommand {
    /// Switch HDMI processing on or off.
    HdmiActive(bool),
    /// Select the sync mode.
    Mode(String),
    /// Select the intensity of the current mode.
    Intensity(String),
    /// Select the HDMI source.
    HdmiSource(String),
    /// Start or stop light sync.
    SyncActive(bool),
    /// Brightness on the device scale (0-200).
    Brightness(i64),
}

impl ExecCommand {
    /// Returns the JSON body.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Serializing a plain enum of strings, bools and integers cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
