// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration types for config entries and the polling coordinator.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Integration domain, used in device identifiers.
pub const DOMAIN: &str = "ledmatrix_controller";

/// Default port of the LedMatrixOS web API.
pub const DEFAULT_PORT: u16 = 5005;

/// Default display name of a matrix device.
pub const DEFAULT_NAME: &str = "LED Matrix";

/// Interval between two scheduled refreshes.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(5);

/// Overall deadline of a single refresh.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifier of a config entry.
///
/// The host usually supplies its own identifier; [`EntryId::new`] generates
/// a random one for entries created outside of a host.
///
/// # Examples
///
/// ```
/// use ledmatrix_controller::config::EntryId;
///
/// let id = EntryId::from("01J9ZC7TQ4");
/// assert_eq!(id.as_str(), "01J9ZC7TQ4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new random entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A config entry describing one matrix device.
///
/// Entries deserialize from the data the host stores for them; only `host`
/// is required.
///
/// # Examples
///
/// ```
/// use ledmatrix_controller::config::ConfigEntry;
///
/// let entry: ConfigEntry = serde_json::from_str(
///     r#"{"entry_id": "kitchen", "host": "192.168.1.40"}"#,
/// ).unwrap();
/// assert_eq!(entry.port, 5005);
/// assert_eq!(entry.name, "LED Matrix");
///
/// let entry = ConfigEntry::new("192.168.1.41").with_port(8080);
/// assert_eq!(entry.port, 8080);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Identifier of the entry.
    #[serde(default)]
    pub entry_id: EntryId,
    /// Hostname or IP address of the device.
    pub host: String,
    /// Port of the device's web API.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Display name of the device.
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl ConfigEntry {
    /// Creates an entry for `host` with a fresh identifier and default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            entry_id: EntryId::new(),
            host: host.into(),
            port: DEFAULT_PORT,
            name: DEFAULT_NAME.to_string(),
        }
    }

    /// Sets the entry identifier.
    #[must_use]
    pub fn with_entry_id(mut self, entry_id: impl Into<EntryId>) -> Self {
        self.entry_id = entry_id.into();
        self
    }

    /// Sets the web API port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Timing configuration of a [`Coordinator`](crate::coordinator::Coordinator).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ledmatrix_controller::config::CoordinatorConfig;
///
/// let config = CoordinatorConfig::default();
/// assert_eq!(config.update_interval(), Duration::from_secs(5));
///
/// let config = CoordinatorConfig::new()
///     .with_update_interval(Duration::from_secs(30))
///     .with_request_timeout(Duration::from_secs(3));
/// assert_eq!(config.request_timeout(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    update_interval: Duration,
    request_timeout: Duration,
}

impl CoordinatorConfig {
    /// Creates a configuration with the default interval and deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interval between scheduled refreshes.
    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Sets the overall deadline of a refresh.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the interval between scheduled refreshes.
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Returns the overall deadline of a refresh.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            update_interval: UPDATE_INTERVAL,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}
