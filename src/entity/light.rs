// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light adapter: panel output as an on/off light with brightness.

use serde_json::{Map, Value};

use super::{CoordinatorEntity, DeviceInfo, Entity, EntityState, Platform};
use crate::config::ConfigEntry;
use crate::coordinator::Coordinator;
use crate::protocol::{HttpClient, Protocol};
use crate::types::{level_to_percent, percent_to_level};

/// Colour modes a light can support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Brightness only, no colour.
    Brightness,
}

impl ColorMode {
    /// Returns the mode name used by the host.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
        }
    }
}

/// The matrix panel as a light.
///
/// `isEnabled` maps to on/off and the device percentage to a 0-255 level.
#[derive(Debug)]
pub struct LedMatrixLight<P: Protocol = HttpClient> {
    base: CoordinatorEntity<P>,
}

impl<P: Protocol> LedMatrixLight<P> {
    /// Creates the light for a config entry.
    #[must_use]
    pub fn new(coordinator: &Coordinator<P>, entry: &ConfigEntry) -> Self {
        Self {
            base: CoordinatorEntity::new(coordinator, entry, "light"),
        }
    }

    /// Returns the shared entity base.
    #[must_use]
    pub fn base(&self) -> &CoordinatorEntity<P> {
        &self.base
    }

    /// Returns the only supported colour mode.
    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        ColorMode::Brightness
    }

    /// Returns whether the panel is on, or `None` without a snapshot.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.base
            .snapshot()
            .map(|snapshot| snapshot.settings.is_enabled)
    }

    /// Returns the brightness level (0-255), or `None` without a snapshot.
    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        self.base
            .snapshot()
            .map(|snapshot| percent_to_level(snapshot.settings.brightness))
    }

    /// Turns the panel on, optionally setting the brightness level first.
    ///
    /// Returns `true` if every command was accepted. A refresh is requested
    /// afterwards either way.
    pub async fn turn_on(&self, brightness: Option<u8>) -> bool {
        let Some(coordinator) = self.base.coordinator_or_warn() else {
            return false;
        };

        let mut accepted = true;
        if let Some(level) = brightness {
            accepted &= coordinator.set_brightness(level_to_percent(level)).await;
        }
        accepted &= coordinator.set_power(true).await;

        self.base.refresh_after_command(&coordinator).await;
        accepted
    }

    /// Turns the panel off.
    ///
    /// Returns `true` if the command was accepted.
    pub async fn turn_off(&self) -> bool {
        let Some(coordinator) = self.base.coordinator_or_warn() else {
            return false;
        };

        let accepted = coordinator.set_power(false).await;
        self.base.refresh_after_command(&coordinator).await;
        accepted
    }
}

impl<P: Protocol> Entity for LedMatrixLight<P> {
    fn platform(&self) -> Platform {
        Platform::Light
    }

    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> Option<&str> {
        None
    }

    fn device_info(&self) -> &DeviceInfo {
        self.base.device_info()
    }

    fn available(&self) -> bool {
        self.base.available()
    }

    fn state(&self) -> EntityState {
        match self.is_on() {
            Some(true) => EntityState::On,
            Some(false) => EntityState::Off,
            None => EntityState::Unknown,
        }
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert(
            "color_mode".to_string(),
            Value::from(self.color_mode().as_str()),
        );
        if let Some(brightness) = self.brightness() {
            attributes.insert("brightness".to_string(), Value::from(brightness));
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::testing::FakeDevice;
    use crate::entity::tests::{entry, ready_coordinator};

    #[tokio::test]
    async fn reads_example_snapshot() {
        let device = FakeDevice::example();
        let coordinator = ready_coordinator(&device).await;
        let light = LedMatrixLight::new(&coordinator, &entry());

        assert_eq!(light.unique_id(), "entry1_light");
        assert_eq!(light.name(), None);
        assert_eq!(light.is_on(), Some(true));
        assert_eq!(light.brightness(), Some(127));
        assert_eq!(light.state(), EntityState::On);
        assert_eq!(light.attributes()["brightness"], 127);
    }

    #[tokio::test]
    async fn unknown_without_snapshot() {
        let device = FakeDevice::default();
        let coordinator = Coordinator::new(device.clone());
        let light = LedMatrixLight::new(&coordinator, &entry());

        assert_eq!(light.is_on(), None);
        assert_eq!(light.brightness(), None);
        assert_eq!(light.state(), EntityState::Unknown);
        assert!(!light.available());
    }

    #[tokio::test]
    async fn turn_on_with_brightness_sets_level_then_power() {
        let device = FakeDevice::example();
        device.respond("/settings/brightness/49", 200, "{}");
        device.respond("/settings/power/true", 200, "{}");
        let coordinator = ready_coordinator(&device).await;
        let light = LedMatrixLight::new(&coordinator, &entry());

        assert!(light.turn_on(Some(127)).await);

        assert_eq!(
            device.requests()[2..],
            [
                "POST /settings/brightness/49",
                "POST /settings/power/true",
                "GET /settings",
                "GET /apps"
            ]
        );
    }

    #[tokio::test]
    async fn turn_on_without_brightness_only_powers_on() {
        let device = FakeDevice::example();
        device.respond("/settings/power/true", 200, "{}");
        let coordinator = ready_coordinator(&device).await;
        let light = LedMatrixLight::new(&coordinator, &entry());

        assert!(light.turn_on(None).await);
        assert_eq!(device.count("POST /settings/power/true"), 1);
        assert_eq!(device.count("GET /settings"), 2);
    }

    #[tokio::test]
    async fn turn_off_reports_rejection_and_still_refreshes() {
        let device = FakeDevice::example();
        device.respond("/settings/power/false", 500, "");
        let coordinator = ready_coordinator(&device).await;
        let light = LedMatrixLight::new(&coordinator, &entry());

        assert!(!light.turn_off().await);
        assert_eq!(device.count("GET /settings"), 2);
    }

    #[tokio::test]
    async fn commands_ignored_after_teardown() {
        let device = FakeDevice::example();
        let coordinator = ready_coordinator(&device).await;
        let light = LedMatrixLight::new(&coordinator, &entry());
        drop(coordinator);

        assert!(!light.turn_off().await);
        assert_eq!(device.count("POST /settings/power/false"), 0);
    }
}
