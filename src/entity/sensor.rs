// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor adapters: frame rate and engine status.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{CoordinatorEntity, DeviceInfo, Entity, EntityState, Platform};
use crate::config::ConfigEntry;
use crate::coordinator::Coordinator;
use crate::protocol::{HttpClient, Protocol};
use crate::state::Settings;

/// State class of a sensor, used by the host for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateClass {
    /// Instantaneous measurement.
    Measurement,
}

impl StateClass {
    /// Returns the state class name used by the host.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Measurement => "measurement",
        }
    }
}

/// Rendering frame rate of the display engine.
#[derive(Debug)]
pub struct FpsSensor<P: Protocol = HttpClient> {
    base: CoordinatorEntity<P>,
}

impl<P: Protocol> FpsSensor<P> {
    /// Unit of measurement.
    pub const UNIT: &'static str = "fps";

    /// Creates the sensor for a config entry.
    #[must_use]
    pub fn new(coordinator: &Coordinator<P>, entry: &ConfigEntry) -> Self {
        Self {
            base: CoordinatorEntity::new(coordinator, entry, "fps"),
        }
    }

    /// Returns the shared entity base.
    #[must_use]
    pub fn base(&self) -> &CoordinatorEntity<P> {
        &self.base
    }

    /// Returns the frame rate, or `None` if unknown.
    #[must_use]
    pub fn native_value(&self) -> Option<u32> {
        self.base.snapshot().and_then(|snapshot| snapshot.settings.fps)
    }

    /// Returns the unit of [`native_value`](Self::native_value).
    #[must_use]
    pub fn native_unit_of_measurement(&self) -> &'static str {
        Self::UNIT
    }

    /// Returns the state class; frame rate is a measurement.
    #[must_use]
    pub fn state_class(&self) -> StateClass {
        StateClass::Measurement
    }
}

impl<P: Protocol> Entity for FpsSensor<P> {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> Option<&str> {
        Some("FPS")
    }

    fn icon(&self) -> Option<&str> {
        Some("mdi:speedometer")
    }

    fn device_info(&self) -> &DeviceInfo {
        self.base.device_info()
    }

    fn available(&self) -> bool {
        self.base.available()
    }

    fn state(&self) -> EntityState {
        self.native_value()
            .map_or(EntityState::Unknown, |fps| EntityState::Integer(i64::from(fps)))
    }
}

/// Engine status derived from `isRunning` and `isEnabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    /// Engine running with output enabled.
    Running,
    /// Engine running with output disabled.
    RunningDisabled,
    /// Engine stopped.
    Stopped,
}

impl DisplayStatus {
    /// Derives the status from device settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        match (settings.is_running, settings.is_enabled) {
            (true, true) => Self::Running,
            (true, false) => Self::RunningDisabled,
            (false, _) => Self::Stopped,
        }
    }

    /// Returns the status text shown to users.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::RunningDisabled => "Running (Disabled)",
            Self::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra attributes of the status sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusAttributes {
    /// Panel width in pixels.
    pub width: Option<u32>,
    /// Panel height in pixels.
    pub height: Option<u32>,
    /// Whether the display engine is running.
    pub is_running: bool,
}

impl StatusAttributes {
    /// Picks the panel geometry and running flag out of device settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            is_running: settings.is_running,
        }
    }

    /// Renders the attributes as a JSON object.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("width".to_string(), Value::from(self.width));
        map.insert("height".to_string(), Value::from(self.height));
        map.insert("is_running".to_string(), Value::from(self.is_running));
        map
    }
}

/// Human-readable engine status with panel geometry as attributes.
#[derive(Debug)]
pub struct StatusSensor<P: Protocol = HttpClient> {
    base: CoordinatorEntity<P>,
}

impl<P: Protocol> StatusSensor<P> {
    /// Creates the sensor for a config entry.
    #[must_use]
    pub fn new(coordinator: &Coordinator<P>, entry: &ConfigEntry) -> Self {
        Self {
            base: CoordinatorEntity::new(coordinator, entry, "status"),
        }
    }

    /// Returns the shared entity base.
    #[must_use]
    pub fn base(&self) -> &CoordinatorEntity<P> {
        &self.base
    }

    /// Returns the status, or `None` without a snapshot.
    #[must_use]
    pub fn status(&self) -> Option<DisplayStatus> {
        self.base
            .snapshot()
            .map(|snapshot| DisplayStatus::from_settings(&snapshot.settings))
    }

    /// Returns the extra attributes, or `None` without a snapshot.
    #[must_use]
    pub fn extra_attributes(&self) -> Option<StatusAttributes> {
        self.base
            .snapshot()
            .map(|snapshot| StatusAttributes::from_settings(&snapshot.settings))
    }
}

impl<P: Protocol> Entity for StatusSensor<P> {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> Option<&str> {
        Some("Status")
    }

    fn icon(&self) -> Option<&str> {
        Some("mdi:information-outline")
    }

    fn device_info(&self) -> &DeviceInfo {
        self.base.device_info()
    }

    fn available(&self) -> bool {
        self.base.available()
    }

    fn state(&self) -> EntityState {
        self.status().map_or(EntityState::Unknown, |status| {
            EntityState::Text(status.to_string())
        })
    }

    fn attributes(&self) -> Map<String, Value> {
        self.extra_attributes()
            .map(|attributes| attributes.to_map())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::testing::FakeDevice;
    use crate::entity::tests::{entry, ready_coordinator};

    fn settings(is_running: bool, is_enabled: bool) -> Settings {
        serde_json::from_value(serde_json::json!({
            "isRunning": is_running,
            "isEnabled": is_enabled,
        }))
        .unwrap()
    }

    #[test]
    fn status_from_flags() {
        assert_eq!(
            DisplayStatus::from_settings(&settings(true, true)),
            DisplayStatus::Running
        );
        assert_eq!(
            DisplayStatus::from_settings(&settings(true, false)).to_string(),
            "Running (Disabled)"
        );
        assert_eq!(
            DisplayStatus::from_settings(&settings(false, true)),
            DisplayStatus::Stopped
        );
        assert_eq!(
            DisplayStatus::from_settings(&settings(false, false)),
            DisplayStatus::Stopped
        );
    }

    #[tokio::test]
    async fn fps_reads_example_snapshot() {
        let device = FakeDevice::example();
        let coordinator = ready_coordinator(&device).await;
        let fps = FpsSensor::new(&coordinator, &entry());

        assert_eq!(fps.unique_id(), "entry1_fps");
        assert_eq!(fps.native_value(), Some(30));
        assert_eq!(fps.native_unit_of_measurement(), "fps");
        assert_eq!(fps.state_class(), StateClass::Measurement);
        assert_eq!(fps.state().to_string(), "30");
    }

    #[tokio::test]
    async fn fps_unknown_when_missing() {
        let device = FakeDevice::example();
        device.respond("/settings", 200, r#"{"isEnabled":true}"#);
        let coordinator = ready_coordinator(&device).await;
        let fps = FpsSensor::new(&coordinator, &entry());

        assert_eq!(fps.native_value(), None);
        assert_eq!(fps.state(), EntityState::Unknown);
    }

    #[tokio::test]
    async fn status_reads_example_snapshot() {
        let device = FakeDevice::example();
        let coordinator = ready_coordinator(&device).await;
        let status = StatusSensor::new(&coordinator, &entry());

        assert_eq!(status.unique_id(), "entry1_status");
        assert_eq!(status.state(), EntityState::Text("Running".to_string()));
        assert_eq!(
            status.extra_attributes(),
            Some(StatusAttributes {
                width: Some(64),
                height: Some(32),
                is_running: true,
            })
        );
        assert_eq!(
            Value::Object(status.attributes()),
            serde_json::json!({"width": 64, "height": 32, "is_running": true})
        );
    }

    #[tokio::test]
    async fn status_without_snapshot() {
        let device = FakeDevice::example();
        let coordinator = Coordinator::new(device.clone());
        let status = StatusSensor::new(&coordinator, &entry());

        assert_eq!(status.status(), None);
        assert_eq!(status.state(), EntityState::Unknown);
        assert!(status.attributes().is_empty());
    }
}
