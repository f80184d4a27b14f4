// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for LedMatrixOS devices.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::config::{DEFAULT_PORT, REQUEST_TIMEOUT};
use crate::error::ProtocolError;
use crate::protocol::{ApiResponse, Protocol};

// ============================================================================
// HttpConfig
// ============================================================================

/// Connection parameters of a matrix device.
///
/// # Examples
///
/// ```
/// use ledmatrix_controller::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.40");
/// assert_eq!(config.base_url(), "http://192.168.1.40:5005/api");
///
/// let config = HttpConfig::new("matrix.local")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(3));
/// assert_eq!(config.base_url(), "http://matrix.local:8080/api");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpConfig {
    /// Default web API port.
    pub const DEFAULT_PORT: u16 = DEFAULT_PORT;
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = REQUEST_TIMEOUT;

    /// Creates a configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the API root URL.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/api", self.host, self.port)
    }

    /// Creates an `HttpClient` with a dedicated session.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the session cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        let session = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;
        self.with_session(session)
    }

    /// Creates an `HttpClient` that reuses an existing session.
    ///
    /// The session is cloned, never rebuilt, so connection pooling stays
    /// with its owner.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty.
    pub fn with_session(self, session: Client) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        Ok(HttpClient {
            base_url: self.base_url(),
            session,
            timeout: self.timeout,
        })
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for the LedMatrixOS web API.
///
/// # Examples
///
/// ```no_run
/// use ledmatrix_controller::protocol::{HttpConfig, Protocol};
///
/// # async fn example() -> ledmatrix_controller::Result<()> {
/// let client = HttpConfig::new("192.168.1.40").into_client()?;
/// let response = client.get("/settings").await?;
/// println!("{} {}", response.status(), response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    session: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Returns the API root URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn finish(response: reqwest::Response) -> Result<ApiResponse, ProtocolError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(status, body = %body, "Received HTTP response");

        Ok(ApiResponse::new(status, body))
    }
}

fn send_error(err: reqwest::Error) -> ProtocolError {
    if err.is_connect() {
        ProtocolError::ConnectionFailed(err.to_string())
    } else {
        ProtocolError::Http(err)
    }
}

impl Protocol for HttpClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, ProtocolError> {
        let url = self.build_url(path);

        tracing::debug!(url = %url, "Sending HTTP GET");

        let response = self
            .session
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(send_error)?;

        Self::finish(response).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, ProtocolError> {
        let url = self.build_url(path);

        tracing::debug!(url = %url, "Sending HTTP POST");

        let mut request = self.session.post(&url).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(send_error)?;

        Self::finish(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::new("192.168.1.40");
        assert_eq!(config.host(), "192.168.1.40");
        assert_eq!(config.port(), 5005);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn http_config_builder_chain() {
        let config = HttpConfig::new("matrix.local")
            .with_port(8080)
            .with_timeout(Duration::from_secs(2));
        assert_eq!(config.port(), 8080);
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert_eq!(config.base_url(), "http://matrix.local:8080/api");
    }

    #[test]
    fn build_url_appends_path() {
        let client = HttpConfig::new("10.0.0.5").into_client().unwrap();
        assert_eq!(
            client.build_url("/settings/power/true"),
            "http://10.0.0.5:5005/api/settings/power/true"
        );
    }

    #[test]
    fn empty_host_is_rejected() {
        let result = HttpConfig::new("  ").with_session(Client::new());
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn shared_session_is_used() {
        let session = Client::new();
        let client = HttpConfig::new("10.0.0.5")
            .with_port(6000)
            .with_session(session)
            .unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:6000/api");
    }
}
