// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions.
//!
//! Every command is a POST to an endpoint derived from its argument:
//!
//! | Command | Endpoint |
//! |---------|----------|
//! | [`DeviceCommand::SetBrightness`] | `/settings/brightness/{value}` |
//! | [`DeviceCommand::SetPower`] | `/settings/power/{true\|false}` |
//! | [`DeviceCommand::ActivateApp`] | `/apps/{id}` |
//! | [`DeviceCommand::UpdateAppSettings`] | `/apps/{id}/settings` (JSON body) |
//!
//! # Examples
//!
//! ```
//! use ledmatrix_controller::command::{Command, DeviceCommand};
//!
//! let cmd = DeviceCommand::SetPower(false);
//! assert_eq!(cmd.path(), "/settings/power/false");
//!
//! let cmd = DeviceCommand::ActivateApp("clock".to_string());
//! assert_eq!(cmd.path(), "/apps/clock");
//! ```

use serde_json::{Map, Value};

/// A command that can be sent to a matrix device.
pub trait Command {
    /// Returns a short name used in log messages.
    fn name(&self) -> &'static str;

    /// Returns the endpoint path, relative to the API root.
    fn path(&self) -> String;

    /// Returns the JSON body, if the command carries one.
    fn body(&self) -> Option<Value> {
        None
    }
}

/// Commands understood by the LedMatrixOS web API.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// Sets the panel brightness in percent.
    ///
    /// The value is forwarded as is; the device decides what it accepts.
    SetBrightness(u8),

    /// Enables or disables the panel output.
    SetPower(bool),

    /// Makes the app with this id the active one.
    ActivateApp(String),

    /// Updates settings of the currently active app.
    UpdateAppSettings {
        /// The id of the app to update.
        app_id: String,
        /// The settings to change, keyed by setting name.
        settings: Map<String, Value>,
    },
}

impl Command for DeviceCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::SetBrightness(_) => "brightness",
            Self::SetPower(_) => "power",
            Self::ActivateApp(_) => "activate app",
            Self::UpdateAppSettings { .. } => "app settings",
        }
    }

    fn path(&self) -> String {
        match self {
            Self::SetBrightness(value) => format!("/settings/brightness/{value}"),
            Self::SetPower(enabled) => format!("/settings/power/{enabled}"),
            Self::ActivateApp(id) => format!("/apps/{}", urlencoding::encode(id)),
            Self::UpdateAppSettings { app_id, .. } => {
                format!("/apps/{}/settings", urlencoding::encode(app_id))
            }
        }
    }

    fn body(&self) -> Option<Value> {
        match self {
            Self::UpdateAppSettings { settings, .. } => Some(Value::Object(settings.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_path() {
        assert_eq!(
            DeviceCommand::SetBrightness(75).path(),
            "/settings/brightness/75"
        );
    }

    #[test]
    fn brightness_out_of_range_is_forwarded() {
        assert_eq!(
            DeviceCommand::SetBrightness(180).path(),
            "/settings/brightness/180"
        );
    }

    #[test]
    fn power_paths_are_lowercase() {
        assert_eq!(DeviceCommand::SetPower(true).path(), "/settings/power/true");
        assert_eq!(
            DeviceCommand::SetPower(false).path(),
            "/settings/power/false"
        );
    }

    #[test]
    fn activate_app_encodes_id() {
        let cmd = DeviceCommand::ActivateApp("flip clock".to_string());
        assert_eq!(cmd.path(), "/apps/flip%20clock");
        assert!(cmd.body().is_none());
    }

    #[test]
    fn update_app_settings_carries_body() {
        let mut settings = Map::new();
        settings.insert("text".to_string(), Value::from("Hello"));
        let cmd = DeviceCommand::UpdateAppSettings {
            app_id: "scrolling-text".to_string(),
            settings,
        };
        assert_eq!(cmd.path(), "/apps/scrolling-text/settings");
        assert_eq!(cmd.body(), Some(serde_json::json!({"text": "Hello"})));
        assert_eq!(cmd.name(), "app settings");
    }
}
