// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity adapters exposing a matrix device to a home-automation host.
//!
//! Each adapter is a read-only projection of the coordinator's current
//! [`Snapshot`] plus thin command delegation back to the coordinator. No
//! adapter caches device state: every read goes through the snapshot, and
//! every read yields an unknown value while no snapshot exists.
//!
//! | Adapter | Platform | Unique id suffix |
//! |---------|----------|------------------|
//! | [`LedMatrixLight`] | light | `light` |
//! | [`BrightnessNumber`] | number | `brightness_number` |
//! | [`AppSelect`] | select | `app_select` |
//! | [`FpsSensor`] | sensor | `fps` |
//! | [`StatusSensor`] | sensor | `status` |
//!
//! Adapters hold a [`WeakCoordinator`]; once the coordinator is torn down
//! they report themselves unavailable and ignore commands.

mod light;
mod number;
mod select;
mod sensor;

pub use light::{ColorMode, LedMatrixLight};
pub use number::{BrightnessNumber, NumberMode};
pub use select::{AppSelect, AppSelection};
pub use sensor::{DisplayStatus, FpsSensor, StateClass, StatusAttributes, StatusSensor};

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{ConfigEntry, DOMAIN};
use crate::coordinator::{Coordinator, WeakCoordinator};
use crate::protocol::{HttpClient, Protocol};
use crate::state::Snapshot;
use crate::subscription::{Subscribable, SubscriptionId};

/// Manufacturer reported in device metadata.
pub const MANUFACTURER: &str = "LedMatrixOS";

/// Model reported in device metadata.
pub const MODEL: &str = "LED Matrix Display";

/// Entity platforms provided by this integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// On/off light with brightness.
    Light,
    /// Selection from a list of options.
    Select,
    /// Read-only measurement or status.
    Sensor,
    /// Numeric input.
    Number,
}

impl Platform {
    /// Returns the platform name used by the host.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Select => "select",
            Self::Sensor => "sensor",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device metadata shared by all entities of one config entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// `(domain, entry id)` pairs identifying the device.
    pub identifiers: Vec<(String, String)>,
    /// Display name of the device.
    pub name: String,
    /// Device manufacturer.
    pub manufacturer: String,
    /// Device model.
    pub model: String,
}

impl DeviceInfo {
    /// Builds the metadata for a config entry.
    #[must_use]
    pub fn for_entry(entry: &ConfigEntry) -> Self {
        Self {
            identifiers: vec![(DOMAIN.to_string(), entry.entry_id.to_string())],
            name: entry.name.clone(),
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
        }
    }
}

/// State value reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityState {
    /// No snapshot is available, or the value is missing from it.
    Unknown,
    /// Light is on.
    On,
    /// Light is off.
    Off,
    /// Numeric value.
    Integer(i64),
    /// Text value.
    Text(String),
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Common read interface of all entity adapters.
pub trait Entity: Send + Sync {
    /// Returns the platform this entity belongs to.
    fn platform(&self) -> Platform;

    /// Returns the unique id, stable across restarts.
    fn unique_id(&self) -> &str;

    /// Returns the entity name; `None` means "use the device name".
    fn name(&self) -> Option<&str>;

    /// Returns the icon, if the entity overrides the platform default.
    fn icon(&self) -> Option<&str> {
        None
    }

    /// Returns the device metadata.
    fn device_info(&self) -> &DeviceInfo;

    /// Returns `true` if the coordinator is alive and its last refresh succeeded.
    fn available(&self) -> bool;

    /// Returns the current state.
    fn state(&self) -> EntityState;

    /// Returns additional state attributes.
    fn attributes(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Base shared by all adapters: identity plus a weak coordinator link.
#[derive(Debug)]
pub struct CoordinatorEntity<P: Protocol = HttpClient> {
    coordinator: WeakCoordinator<P>,
    unique_id: String,
    device_info: DeviceInfo,
}

impl<P: Protocol> CoordinatorEntity<P> {
    /// Creates the base for the entity `{entry_id}_{suffix}`.
    #[must_use]
    pub fn new(coordinator: &Coordinator<P>, entry: &ConfigEntry, suffix: &str) -> Self {
        Self {
            coordinator: coordinator.downgrade(),
            unique_id: format!("{}_{suffix}", entry.entry_id),
            device_info: DeviceInfo::for_entry(entry),
        }
    }

    /// Returns the coordinator if it is still alive.
    #[must_use]
    pub fn coordinator(&self) -> Option<Coordinator<P>> {
        self.coordinator.upgrade()
    }

    /// Returns the coordinator's latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.coordinator.upgrade()?.snapshot()
    }

    /// Returns the unique id.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Returns the device metadata.
    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Returns `true` if the coordinator is alive and up to date.
    #[must_use]
    pub fn available(&self) -> bool {
        self.coordinator
            .upgrade()
            .is_some_and(|coordinator| coordinator.last_update_success())
    }

    /// Registers `on_update` to run after every refresh attempt.
    ///
    /// Hosts use this to re-read the entity and write its state. Returns
    /// `None` if the coordinator is gone.
    pub fn listen<F>(&self, on_update: F) -> Option<SubscriptionId>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let coordinator = self.coordinator.upgrade()?;
        Some(coordinator.on_refresh(move |_| on_update()))
    }

    /// Removes a listener registered with [`listen`](Self::listen).
    pub fn stop_listening(&self, id: SubscriptionId) -> bool {
        self.coordinator
            .upgrade()
            .is_some_and(|coordinator| coordinator.unsubscribe(id))
    }

    /// Asks the coordinator for an immediate refresh after a command.
    pub(crate) async fn refresh_after_command(&self, coordinator: &Coordinator<P>) {
        if let Err(err) = coordinator.request_refresh().await {
            tracing::debug!(entity = %self.unique_id, error = %err, "Refresh after command failed");
        }
    }

    pub(crate) fn coordinator_or_warn(&self) -> Option<Coordinator<P>> {
        let coordinator = self.coordinator.upgrade();
        if coordinator.is_none() {
            tracing::warn!(entity = %self.unique_id, "Coordinator is gone, ignoring command");
        }
        coordinator
    }
}
