// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `HueSync` library.
//!
//! The hierarchy mirrors how failures are handled at runtime: configuration
//! errors must be fixed by the user, reachability and poll errors tear the
//! connector down and trigger a timed retry, pairing errors are retried on
//! the next tick, and command send errors are only logged.

use thiserror::Error;

use crate::state::ChannelKey;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration is invalid and must be corrected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The initial reachability probe against `/device` failed.
    #[error("device unreachable: {0}")]
    Reachability(ProtocolError),

    /// A status poll failed. Fatal for the current connector instance.
    #[error("{0}")]
    Poll(#[from] PollError),

    /// A registration attempt failed. Retried on the next pairing tick.
    #[error("pairing attempt failed: {0}")]
    Pairing(PollError),

    /// An execution command could not be delivered.
    #[error("failed to send command: {0}")]
    CommandSend(ProtocolError),

    /// The channel does not accept the given command.
    #[error("unsupported command {command} for channel {channel}")]
    UnsupportedCommand {
        /// Channel the command was addressed to.
        channel: ChannelKey,
        /// Rendered command.
        command: String,
    },

    /// The connector is not polling, so commands cannot be sent.
    #[error("device is not connected")]
    NotConnected,

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

impl Error {
    /// Returns `true` if a new connection attempt may succeed without user
    /// intervention.
    ///
    /// Only configuration errors require the user to fix their input.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

/// Errors related to the persisted configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The polling interval is below the allowed minimum.
    #[error("The polling interval should be at least {min} seconds!")]
    PollingIntervalTooLow {
        /// Minimum interval in seconds.
        min: u64,
        /// The configured interval in seconds.
        actual: u64,
    },

    /// No host was configured.
    #[error("no host configured")]
    MissingHost,

    /// Reading or writing the configuration store failed.
    #[error("configuration store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration store contents could not be (de)serialized.
    #[error("configuration store is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// A numeric command could not be parsed.
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// Errors related to HTTP communication with the sync box.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed (connection refused, timeout, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered with a non-success status code.
    #[error("HTTP {status} - {reason}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// The device answered, but not with what the endpoint returns.
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed, including missing or mistyped fields.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// A channel identifier did not match any known channel.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
}

/// A failed status request, either on the wire or while decoding.
#[derive(Debug, Error)]
pub enum PollError {
    /// The request itself failed.
    #[error("API Error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The response could not be turned into device state.
    #[error("Internal Error while updating box state: {0}")]
    Parse(#[from] ParseError),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
