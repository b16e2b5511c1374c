// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTPS client for the sync box REST API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::command::ExecCommand;
use crate::error::{ParseError, PollError, ProtocolError};
use crate::protocol::payload::{RegistrationRequest, RegistrationResponse, parse_status};
use crate::state::StatusSnapshot;

/// Client for the `/api/v1` endpoints of one sync box.
///
/// The device presents a self-signed certificate, so certificate
/// validation is disabled unless [`ApiClientBuilder::verify_certificates`]
/// is set.
///
/// # Examples
///
/// ```
/// use huesync_lib::protocol::ApiClient;
///
/// let client = ApiClient::new("192.168.1.50").unwrap();
/// assert_eq!(client.base_url(), "https://192.168.1.50/api/v1");
///
/// let client = ApiClient::new("http://127.0.0.1:8080").unwrap();
/// assert_eq!(client.base_url(), "http://127.0.0.1:8080/api/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    request_timeout: Duration,
    pairing_timeout: Duration,
}

impl ApiClient {
    /// Timeout for probe, status and command requests.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
    /// Timeout for registration requests.
    pub const DEFAULT_PAIRING_TIMEOUT: Duration = Duration::from_secs(2);

    /// Creates a client with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be
    /// created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        ApiClientBuilder::new().host(host).build()
    }

    /// Returns the API root, e.g. `https://192.168.1.50/api/v1`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Unauthenticated reachability probe against `GET /device`.
    ///
    /// Returns the device description.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a body
    /// that is not a JSON object.
    pub async fn device_info(&self) -> Result<serde_json::Value, ProtocolError> {
        let url = self.url("/device");
        tracing::debug!(url = %url, "Probing device");

        let response = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let body = success_body(response).await?;

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) if value.is_object() => Ok(value),
            _ => Err(ProtocolError::UnexpectedBody(body)),
        }
    }

    /// Sends one registration request to `POST /registrations`.
    ///
    /// The body is decoded regardless of the status code since the device
    /// reports "press the button" as an error response.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an undecodable body.
    pub async fn register(&self, instance_id: &str) -> Result<RegistrationResponse, PollError> {
        let url = self.url("/registrations");
        let request = RegistrationRequest::new(instance_id);
        tracing::debug!(url = %url, instance = %request.instance_name, "Sending registration");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(self.pairing_timeout)
            .send()
            .await
            .map_err(ProtocolError::Http)?;
        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::trace!(body = %body, "Received registration response");
        serde_json::from_str(&body)
            .map_err(ParseError::Json)
            .map_err(PollError::Parse)
    }

    /// Fetches and decodes the full status document from `GET /`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or any
    /// malformed field.
    pub async fn status(&self, token: &str) -> Result<StatusSnapshot, PollError> {
        let url = self.base_url.clone();
        tracing::debug!(url = %url, "Polling device status");

        let response = self
            .authorized(self.client.get(&url), token)
            .send()
            .await
            .map_err(ProtocolError::Http)?;
        let body = success_body(response).await?;

        tracing::trace!(body = %body, "Received status document");
        Ok(parse_status(&body)?)
    }

    /// Sends an execution patch to `PUT /execution`.
    ///
    /// Returns the response status without interpreting it.
    ///
    /// # Errors
    ///
    /// Returns error only on transport failure.
    pub async fn execute(
        &self,
        token: &str,
        command: &ExecCommand,
    ) -> Result<StatusCode, ProtocolError> {
        let url = self.url("/execution");
        let body = command.to_json();
        tracing::debug!(url = %url, body = %body, "Sending execution command");

        let response = self
            .authorized(self.client.put(&url), token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Ok(response.status())
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.bearer_auth(token).timeout(self.request_timeout)
    }
}

async fn success_body(response: Response) -> Result<String, ProtocolError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProtocolError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Builder for an [`ApiClient`] with custom timeouts.
#[derive(Debug)]
pub struct ApiClientBuilder {
    host: Option<String>,
    request_timeout: Duration,
    pairing_timeout: Duration,
    verify_certificates: bool,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            host: None,
            request_timeout: ApiClient::DEFAULT_REQUEST_TIMEOUT,
            pairing_timeout: ApiClient::DEFAULT_PAIRING_TIMEOUT,
            verify_certificates: false,
        }
    }
}

impl ApiClientBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host address. An explicit `http://` or `https://` prefix is
    /// kept, otherwise HTTPS is used.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
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

    /// Enables certificate validation.
    #[must_use]
    pub fn verify_certificates(mut self, verify: bool) -> Self {
        self.verify_certificates = verify;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns error if host is not set or client creation fails.
    pub fn build(self) -> Result<ApiClient, ProtocolError> {
        let host = self
            .host
            .map(|h| h.trim().trim_end_matches('/').to_string())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProtocolError::InvalidAddress("host is required".to_string()))?;

        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("https://{host}")
        };

        let client = Client::builder()
            .danger_accept_invalid_certs(!self.verify_certificates)
            .build()?;

        Ok(ApiClient {
            base_url: format!("{base}/api/v1"),
            client,
            request_timeout: self.request_timeout,
            pairing_timeout: self.pairing_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_uses_https() {
        let client = ApiClient::new("huesyncbox-abc123").unwrap();
        assert_eq!(client.base_url(), "https://huesyncbox-abc123/api/v1");
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let client = ApiClient::new("http://10.0.0.2:8443/").unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.2:8443/api/v1");
    }

    #[test]
    fn builder_missing_host() {
        assert!(ApiClientBuilder::new().build().is_err());
        assert!(ApiClient::new("   ").is_err());
    }

    #[test]
    fn builder_with_all_options() {
        let client = ApiClientBuilder::new()
            .host("192.168.1.50")
            .request_timeout(Duration::from_millis(300))
            .pairing_timeout(Duration::from_millis(100))
            .verify_certificates(true)
            .build()
            .unwrap();

        assert_eq!(client.request_timeout, Duration::from_millis(300));
        assert_eq!(client.pairing_timeout, Duration::from_millis(100));
        assert_eq!(client.url("/device"), "https://192.168.1.50/api/v1/device");
    }
}
