// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the LED matrix controller.
//!
//! Three layers are distinguished:
//!
//! - [`ProtocolError`]: a single HTTP exchange could not be completed
//! - [`RefreshError`]: a refresh cycle failed and the snapshot was kept as is
//! - [`Error`]: crate-level failures such as an aborted entry setup

use std::time::Duration;

use thiserror::Error;

use crate::config::EntryId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The first refresh of a config entry failed, so no entities were created.
    #[error("setup of entry {entry_id} failed: {source}")]
    SetupFailed {
        /// The entry whose setup was aborted.
        entry_id: EntryId,
        /// The refresh failure that aborted it.
        #[source]
        source: RefreshError,
    },

    /// The config entry is already set up.
    #[error("entry {0} is already set up")]
    AlreadySetUp(EntryId),

    /// The config entry is unknown to the integration.
    #[error("entry {0} not found")]
    EntryNotFound(EntryId),
}

/// Errors related to a single HTTP exchange with the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device could not be reached (refused, unreachable, DNS).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a refresh of the device snapshot failed.
///
/// A failed refresh never discards the previously stored snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The overall refresh deadline was exceeded.
    #[error("timeout communicating with API after {0:?}")]
    Timeout(Duration),

    /// The device answered with something other than HTTP 200.
    #[error("error fetching {endpoint}: HTTP {status}")]
    UpstreamStatus {
        /// The endpoint that answered, relative to the API root.
        endpoint: String,
        /// The HTTP status code returned.
        status: u16,
    },

    /// Connection, DNS, socket or body decoding failure.
    #[error("error communicating with API: {0}")]
    Transport(String),
}

impl RefreshError {
    /// Returns the HTTP status for [`RefreshError::UpstreamStatus`] failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this failure was a deadline expiry.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<ProtocolError> for RefreshError {
    fn from(err: ProtocolError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<ParseError> for RefreshError {
    fn from(err: ParseError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
