// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the LedMatrixOS web API.
//!
//! The [`Protocol`] trait is the seam between the coordinator and the HTTP
//! session. [`HttpClient`] implements it on top of a shared
//! [`reqwest::Client`], which the caller owns and may reuse for other
//! devices.
//!
//! Non-200 answers are not errors at this layer: they are returned as an
//! [`ApiResponse`] and judged by the caller.

mod http;

pub use http::{HttpClient, HttpConfig};

use std::future::Future;

use serde_json::Value;

use crate::command::Command;
use crate::error::{ParseError, ProtocolError};

/// HTTP status the device uses for every successful call.
pub const STATUS_OK: u16 = 200;

/// Response from the device web API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    /// Creates a response with the given status and raw body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` if the device answered HTTP 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON into the target type.
    ///
    /// # Errors
    ///
    /// Returns error if the body is not valid JSON for `T`.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// Trait for transports that can reach the device web API.
///
/// Paths are relative to the API root, e.g. `/settings`.
pub trait Protocol: Send + Sync + 'static {
    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if no response could be obtained.
    fn get(&self, path: &str) -> impl Future<Output = Result<ApiResponse, ProtocolError>> + Send;

    /// Issues a POST request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if no response could be obtained.
    fn post(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<ApiResponse, ProtocolError>> + Send;

    /// Sends a device command as a POST to its endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if no response could be obtained.
    fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> impl Future<Output = Result<ApiResponse, ProtocolError>> + Send {
        let path = command.path();
        let body = command.body();
        async move { self.post(&path, body.as_ref()).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_ok_only_for_200() {
        assert!(ApiResponse::new(200, "{}").is_ok());
        assert!(!ApiResponse::new(204, "").is_ok());
        assert!(!ApiResponse::new(404, "").is_ok());
    }

    #[test]
    fn response_parse_json() {
        let response = ApiResponse::new(200, r#"{"brightness": 42}"#);
        let value: Value = response.parse().unwrap();
        assert_eq!(value["brightness"], 42);
    }

    #[test]
    fn response_parse_invalid_json() {
        let response = ApiResponse::new(200, "<html>");
        assert!(response.parse::<Value>().is_err());
    }
}
