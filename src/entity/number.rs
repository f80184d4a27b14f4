// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Number adapter: brightness in device percent.

use super::{CoordinatorEntity, DeviceInfo, Entity, EntityState, Platform};
use crate::config::ConfigEntry;
use crate::coordinator::Coordinator;
use crate::protocol::{HttpClient, Protocol};
use crate::types::MAX_PERCENT;

/// How the host renders a number entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberMode {
    /// Let the host decide.
    Auto,
    /// Input box.
    Box,
    /// Slider.
    Slider,
}

impl NumberMode {
    /// Returns the mode name used by the host.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Box => "box",
            Self::Slider => "slider",
        }
    }
}

/// Brightness exposed directly in device percent (0-100).
#[derive(Debug)]
pub struct BrightnessNumber<P: Protocol = HttpClient> {
    base: CoordinatorEntity<P>,
}

impl<P: Protocol> BrightnessNumber<P> {
    /// Creates the number for a config entry.
    #[must_use]
    pub fn new(coordinator: &Coordinator<P>, entry: &ConfigEntry) -> Self {
        Self {
            base: CoordinatorEntity::new(coordinator, entry, "brightness_number"),
        }
    }

    /// Returns the shared entity base.
    #[must_use]
    pub fn base(&self) -> &CoordinatorEntity<P> {
        &self.base
    }

    /// Returns the brightness in percent, or `None` without a snapshot.
    #[must_use]
    pub fn native_value(&self) -> Option<u8> {
        self.base
            .snapshot()
            .map(|snapshot| snapshot.settings.brightness)
    }

    /// Lowest value offered to users.
    #[must_use]
    pub fn native_min_value(&self) -> f64 {
        0.0
    }

    /// Highest value offered to users.
    #[must_use]
    pub fn native_max_value(&self) -> f64 {
        f64::from(MAX_PERCENT)
    }

    /// Increment between offered values.
    #[must_use]
    pub fn native_step(&self) -> f64 {
        1.0
    }

    /// Input widget the host should render.
    #[must_use]
    pub fn mode(&self) -> NumberMode {
        NumberMode::Slider
    }

    /// Sends `value` to the device and requests a refresh.
    ///
    /// The value is rounded and saturated into 0-255; range checks are left
    /// to the host and the device. Returns `true` if the device accepted it.
    pub async fn set_native_value(&self, value: f64) -> bool {
        let Some(coordinator) = self.base.coordinator_or_warn() else {
            return false;
        };

        let percent = to_percent(value);
        let accepted = coordinator.set_brightness(percent).await;
        self.base.refresh_after_command(&coordinator).await;
        accepted
    }
}

// NaN maps to 0; the cast saturates.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(value: f64) -> u8 {
    value.round() as u8
}

impl<P: Protocol> Entity for BrightnessNumber<P> {
    fn platform(&self) -> Platform {
        Platform::Number
    }

    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> Option<&str> {
        Some("Brightness")
    }

    fn icon(&self) -> Option<&str> {
        Some("mdi:brightness-6")
    }

    fn device_info(&self) -> &DeviceInfo {
        self.base.device_info()
    }

    fn available(&self) -> bool {
        self.base.available()
    }

    fn state(&self) -> EntityState {
        self.native_value()
            .map_or(EntityState::Unknown, |value| {
                EntityState::Integer(i64::from(value))
            })
    }
}
