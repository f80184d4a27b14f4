// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire bodies and the refresh snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Brightness reported when the device omits the field.
const DEFAULT_BRIGHTNESS: u8 = 100;

fn default_brightness() -> u8 {
    DEFAULT_BRIGHTNESS
}

/// Panel and render-engine settings.
///
/// Missing flags read as `false`, a missing brightness as 100%.
///
/// # Examples
///
/// ```
/// use ledmatrix_controller::state::Settings;
///
/// let settings: Settings = serde_json::from_str(
///     r#"{"isEnabled":true,"isRunning":true,"brightness":50,"fps":30,"width":64,"height":32}"#,
/// ).unwrap();
/// assert!(settings.is_enabled);
/// assert_eq!(settings.brightness, 50);
/// assert_eq!(settings.fps, Some(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether the panel output is enabled.
    #[serde(default)]
    pub is_enabled: bool,
    /// Whether the render engine is running.
    #[serde(default)]
    pub is_running: bool,
    /// Panel brightness in percent.
    #[serde(default = "default_brightness")]
    pub brightness: u8,
    /// Target frames per second of the render engine.
    #[serde(default)]
    pub fps: Option<u32>,
    /// Panel width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Panel height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_enabled: false,
            is_running: false,
            brightness: DEFAULT_BRIGHTNESS,
            fps: None,
            width: None,
            height: None,
        }
    }
}

/// An app installed on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    /// Stable app identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the app exposes configurable settings.
    #[serde(default)]
    pub has_settings: bool,
}

impl AppInfo {
    /// Creates an app entry.
    #[must_use]
    pub fn new(id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_string),
            has_settings: false,
        }
    }

    /// Returns the name shown to users, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Body of `GET /apps`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppList {
    /// Installed apps, in device order.
    #[serde(default)]
    pub apps: Vec<AppInfo>,
    /// Id of the active app, if any.
    #[serde(default)]
    pub active_app: Option<String>,
}

/// Kind of value an app setting holds.
///
/// The device sends the kind as its numeric code; names are accepted too.
/// Anything else reads as [`AppSettingType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AppSettingType {
    /// `true` or `false`.
    Boolean,
    /// Whole number, optionally bounded by `minValue`/`maxValue`.
    Integer,
    /// Free text.
    String,
    /// Colour string such as `#ff8800`.
    Color,
    /// One of the listed `options`.
    Select,
    /// A kind this library does not know.
    Other,
}

impl AppSettingType {
    const ALL: [Self; 5] = [
        Self::Boolean,
        Self::Integer,
        Self::String,
        Self::Color,
        Self::Select,
    ];

    /// Returns the numeric code used on the wire.
    #[must_use]
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Boolean => Some(0),
            Self::Integer => Some(1),
            Self::String => Some(2),
            Self::Color => Some(3),
            Self::Select => Some(4),
            Self::Other => None,
        }
    }

    /// Returns the kind's name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Color => "color",
            Self::Select => "select",
            Self::Other => "other",
        }
    }
}

impl From<Value> for AppSettingType {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(code) => code
                .as_u64()
                .and_then(|code| {
                    Self::ALL
                        .into_iter()
                        .find(|kind| kind.code().map(u64::from) == Some(code))
                })
                .unwrap_or(Self::Other),
            Value::String(name) => Self::ALL
                .into_iter()
                .find(|kind| kind.as_str().eq_ignore_ascii_case(&name))
                .unwrap_or(Self::Other),
            _ => Self::Other,
        }
    }
}

impl From<AppSettingType> for Value {
    fn from(kind: AppSettingType) -> Self {
        kind.code().map_or(Value::Null, Value::from)
    }
}

/// One configurable setting of an app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSetting {
    /// Key used when updating the setting.
    pub key: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Help text.
    #[serde(default)]
    pub description: String,
    /// Kind of value.
    #[serde(rename = "type")]
    pub kind: AppSettingType,
    /// Value used when the user never changed it.
    #[serde(default)]
    pub default_value: Value,
    /// Value in effect.
    #[serde(default)]
    pub current_value: Value,
    /// Lower bound, for integer settings.
    #[serde(default)]
    pub min_value: Option<Value>,
    /// Upper bound, for integer settings.
    #[serde(default)]
    pub max_value: Option<Value>,
    /// Allowed values, for select settings.
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// Body of `GET /apps/{id}/settings`.
///
/// Apps without configurable settings report an empty list.
///
/// # Examples
///
/// ```
/// use ledmatrix_controller::state::{AppSettings, AppSettingType};
///
/// let settings: AppSettings = serde_json::from_str(
///     r#"{"appId":"clock","settings":[{"key":"format24h","name":"24 hour","description":"",
///         "type":0,"defaultValue":true,"currentValue":false}]}"#,
/// ).unwrap();
/// let format = settings.get("format24h").unwrap();
/// assert_eq!(format.kind, AppSettingType::Boolean);
/// assert_eq!(format.current_value, false);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// The app the settings belong to.
    pub app_id: String,
    /// Settings in device order.
    #[serde(default)]
    pub settings: Vec<AppSetting>,
}

impl AppSettings {
    /// Finds a setting by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AppSetting> {
        self.settings.iter().find(|setting| setting.key == key)
    }

    /// Returns the current values keyed by setting key.
    ///
    /// The result has the shape `update_app_settings` expects.
    #[must_use]
    pub fn current_values(&self) -> Map<String, Value> {
        self.settings
            .iter()
            .map(|setting| (setting.key.clone(), setting.current_value.clone()))
            .collect()
    }

    /// Returns `true` if the app has no configurable settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Device state captured by one successful refresh.
///
/// A snapshot is never mutated; every refresh publishes a new one.
/// `active_app` may name an id missing from `apps`, which consumers treat
/// as "no current selection".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Panel and engine settings.
    pub settings: Settings,
    /// Installed apps.
    pub apps: Vec<AppInfo>,
    /// Id of the active app.
    pub active_app: Option<String>,
    /// When the refresh completed.
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Merges the two endpoint bodies into a snapshot stamped with the current time.
    #[must_use]
    pub fn new(settings: Settings, app_list: AppList) -> Self {
        Self {
            settings,
            apps: app_list.apps,
            active_app: app_list.active_app,
            fetched_at: Utc::now(),
        }
    }

    /// Returns the active app, if it is present in the app list.
    #[must_use]
    pub fn active_app_info(&self) -> Option<&AppInfo> {
        let active = self.active_app.as_deref()?;
        self.apps.iter().find(|app| app.id == active)
    }

    /// Finds the first app whose display name equals `name`.
    #[must_use]
    pub fn find_app_by_name(&self, name: &str) -> Option<&AppInfo> {
        self.apps.iter().find(|app| app.display_name() == name)
    }

    /// Returns the display names of all apps, in device order.
    #[must_use]
    pub fn app_names(&self) -> Vec<String> {
        self.apps
            .iter()
            .map(|app| app.display_name().to_string())
            .collect()
    }
}
