// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sync box REST API.
//!
//! Endpoints under `https://{host}/api/v1`:
//!
//! - `GET /device`: unauthenticated reachability probe
//! - `POST /registrations`: pairing, returns an access token once the
//!   device's button was pressed
//! - `GET /`: full status document (bearer auth)
//! - `PUT /execution`: single-field execution patch (bearer auth)

mod http;
pub mod payload;

pub use http::{ApiClient, ApiClientBuilder};
pub use payload::{RegistrationOutcome, RegistrationResponse, StatusDocument, parse_status};
